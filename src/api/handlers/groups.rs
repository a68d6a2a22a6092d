use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, error_response};
use crate::api::models::{RoundsResponse, ScheduleRequest, StandingsUpdate};
use crate::domain::{Group, GroupId, MatchResult};

pub async fn register_group(
    State(state): State<Arc<AppState>>,
    Json(group): Json<Group>,
) -> impl IntoResponse {
    match state.service.register_group(group) {
        Ok(group) => (StatusCode::CREATED, Json(group)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn list_groups(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.service.list_groups() {
        Ok(groups) => Json(groups).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn schedule_group(
    State(state): State<Arc<AppState>>,
    Path(group): Path<GroupId>,
    Json(request): Json<ScheduleRequest>,
) -> impl IntoResponse {
    match state.service.schedule_group(&group, request.times_met) {
        Ok(rounds) => (StatusCode::CREATED, Json(RoundsResponse { rounds })).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn record_group_result(
    State(state): State<Arc<AppState>>,
    Path(group): Path<GroupId>,
    Json(result): Json<MatchResult>,
) -> impl IntoResponse {
    match state.service.record_match(&group, result) {
        Ok(table) => Json(StandingsUpdate {
            rows: table.rows,
            pending: table.pending,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}
