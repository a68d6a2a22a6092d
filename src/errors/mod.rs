use anyhow::Context as _;
use thiserror::Error;

use crate::bracket::NodeId;
use crate::domain::GroupId;

/// Failures raised by the progression engine itself.
///
/// Every variant names the entity and the rule it broke so callers can branch
/// on the kind instead of parsing messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid roster: {reason}")]
    InvalidRoster { reason: String },

    #[error("inconsistent data in {context}: {reason}")]
    InconsistentData { context: String, reason: String },

    #[error("promotion rule mismatch for group {group}: {reason}")]
    RuleMismatch { group: GroupId, reason: String },

    #[error("bracket node {node} is not ready: {reason}")]
    NodeNotReady { node: NodeId, reason: String },

    #[error("bracket node {node} ended level without a decisive penalty shootout")]
    MissingTiebreak { node: NodeId },

    #[error("bracket node {node} already has a different result recorded")]
    ResultAlreadyRecorded { node: NodeId },

    #[error("bracket has no node {node}")]
    UnknownNode { node: NodeId },
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn invalid_roster(reason: impl Into<String>) -> Self {
        EngineError::InvalidRoster {
            reason: reason.into(),
        }
    }

    pub fn inconsistent(context: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InconsistentData {
            context: context.into(),
            reason: reason.into(),
        }
    }

    pub fn rule_mismatch(group: &GroupId, reason: impl Into<String>) -> Self {
        EngineError::RuleMismatch {
            group: group.clone(),
            reason: reason.into(),
        }
    }

    pub fn not_ready(node: NodeId, reason: impl Into<String>) -> Self {
        EngineError::NodeNotReady {
            node,
            reason: reason.into(),
        }
    }

    /// Stable name of the error kind, as exposed to API clients
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidRoster { .. } => "InvalidRosterError",
            EngineError::InconsistentData { .. } => "InconsistentDataError",
            EngineError::RuleMismatch { .. } => "RuleMismatchError",
            EngineError::NodeNotReady { .. } => "NodeNotReadyError",
            EngineError::MissingTiebreak { .. } => "MissingTiebreakError",
            EngineError::ResultAlreadyRecorded { .. } => "ResultAlreadyRecordedError",
            EngineError::UnknownNode { .. } => "UnknownNodeError",
        }
    }
}

/// A group or bracket the caller asked for does not exist in the store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity} {id} not found")]
pub struct NotFound {
    pub entity: &'static str,
    pub id: String,
}

impl NotFound {
    pub fn new(entity: &'static str, id: impl ToString) -> Self {
        Self {
            entity,
            id: id.to_string(),
        }
    }
}

/// Add context to store errors
pub fn store_context(operation: &str, key: &str) -> String {
    format!("Failed to {} in store for key: {}", operation, key)
}

/// Add context to parse errors
pub fn parse_context(data_type: &str) -> String {
    format!("Failed to parse {}", data_type)
}

/// Wrap result with store context
pub fn with_store_context<T, E>(result: Result<T, E>, operation: &str, key: &str) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.context(store_context(operation, key))
}

/// Wrap result with parse context
pub fn with_parse_context<T, E>(result: Result<T, E>, data_type: &str) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.context(parse_context(data_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_are_stable() {
        let err = EngineError::invalid_roster("need at least two teams");
        assert_eq!(err.kind(), "InvalidRosterError");
        assert_eq!(err.to_string(), "invalid roster: need at least two teams");

        let err = EngineError::MissingTiebreak { node: NodeId(3) };
        assert_eq!(err.kind(), "MissingTiebreakError");
    }

    #[test]
    fn test_engine_error_survives_anyhow() {
        let wrapped: anyhow::Result<()> =
            Err(anyhow::Error::new(EngineError::ResultAlreadyRecorded { node: NodeId(0) }))
                .map_err(|e| e.context("Failed to record bracket result"));

        let err = wrapped.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::ResultAlreadyRecorded { .. })
        ));
    }
}
