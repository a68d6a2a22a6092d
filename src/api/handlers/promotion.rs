use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{AppState, error_response};
use crate::api::models::{PromotionRequest, PromotionResponse};
use crate::domain::PromotionRule;

pub async fn resolve_promotion(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PromotionRequest>,
) -> impl IntoResponse {
    let overrides: BTreeMap<_, _> = request
        .rules
        .into_iter()
        .map(|rule| (rule.group, PromotionRule { bands: rule.bands }))
        .collect();

    match state.service.resolve_promotion(&request.groups, &overrides) {
        Ok(tiers) => Json(PromotionResponse { tiers }).into_response(),
        Err(e) => error_response(e),
    }
}
