use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, error_response};
use crate::api::models::{GenerateFixtureRequest, RoundsResponse};

pub async fn generate_fixture(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateFixtureRequest>,
) -> impl IntoResponse {
    match state.service.generate_fixture(&request.teams, request.times_met) {
        Ok(rounds) => Json(RoundsResponse { rounds }).into_response(),
        Err(e) => error_response(e),
    }
}
