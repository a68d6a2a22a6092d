use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::error;

use crate::api::models::ErrorBody;
use crate::database::SqliteStore;
use crate::domain::UnknownTier;
use crate::errors::{EngineError, NotFound};
use crate::services::ProgressionService;

pub mod brackets;
pub mod fixtures;
pub mod groups;
pub mod promotion;
pub mod standings;

pub struct AppState {
    pub service: ProgressionService<SqliteStore>,
}

/// Maps a failed service call to a JSON error with the matching status
pub fn error_response(err: anyhow::Error) -> Response {
    if let Some(engine) = err.downcast_ref::<EngineError>() {
        return error_body(engine_status(engine), engine.kind(), engine.to_string());
    }
    if let Some(missing) = err.downcast_ref::<NotFound>() {
        return error_body(StatusCode::NOT_FOUND, "NotFound", missing.to_string());
    }
    if let Some(tier) = err.downcast_ref::<UnknownTier>() {
        return error_body(StatusCode::BAD_REQUEST, "UnknownTier", tier.to_string());
    }

    error!("Request failed: {:#}", err);
    error_body(StatusCode::INTERNAL_SERVER_ERROR, "StoreError", format!("{:#}", err))
}

fn engine_status(err: &EngineError) -> StatusCode {
    match err {
        EngineError::InvalidRoster { .. } => StatusCode::BAD_REQUEST,
        EngineError::UnknownNode { .. } => StatusCode::NOT_FOUND,
        EngineError::NodeNotReady { .. } | EngineError::ResultAlreadyRecorded { .. } => StatusCode::CONFLICT,
        EngineError::InconsistentData { .. }
        | EngineError::RuleMismatch { .. }
        | EngineError::MissingTiebreak { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn error_body(status: StatusCode, kind: &str, message: String) -> Response {
    let body = ErrorBody {
        error: kind.to_string(),
        message,
    };
    (status, Json(body)).into_response()
}
