use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, error_response};
use crate::api::models::{BracketResponse, BracketResultRequest, ResetRequest, ResetResponse, SeedRequest};
use crate::domain::Tier;

pub async fn seed_bracket(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SeedRequest>,
) -> impl IntoResponse {
    match state.service.seed_bracket(request.tier, &request.teams) {
        Ok(bracket) => (StatusCode::CREATED, Json(BracketResponse { bracket })).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn record_bracket_result(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BracketResultRequest>,
) -> impl IntoResponse {
    match state
        .service
        .record_bracket_result(request.tier, request.node, request.result)
    {
        Ok(bracket) => Json(BracketResponse { bracket }).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn reset_bracket_node(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResetRequest>,
) -> impl IntoResponse {
    match state.service.reset_bracket_node(request.tier, request.node) {
        Ok((bracket, invalidated)) => Json(ResetResponse { bracket, invalidated }).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_bracket(
    State(state): State<Arc<AppState>>,
    Path(tier): Path<String>,
) -> impl IntoResponse {
    let tier = match tier.parse::<Tier>() {
        Ok(tier) => tier,
        Err(e) => return error_response(e.into()),
    };

    match state.service.bracket(tier) {
        Ok(bracket) => Json(BracketResponse { bracket }).into_response(),
        Err(e) => error_response(e),
    }
}
