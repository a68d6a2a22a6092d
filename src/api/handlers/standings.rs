use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, error_response};
use crate::api::models::StandingsQuery;

pub async fn get_standings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StandingsQuery>,
) -> impl IntoResponse {
    match state.service.standings(&query.group) {
        Ok(table) => Json(table).into_response(),
        Err(e) => error_response(e),
    }
}
