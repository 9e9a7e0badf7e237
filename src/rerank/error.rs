use thiserror::Error;

use crate::model::BackendError;

/// Caller-supplied data that violates a precondition. Detected before any
/// backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("query cannot be empty")]
    EmptyQuery,

    #[error("documents list cannot be empty")]
    EmptyDocuments,

    #[error("top_n must be positive, got {top_n}")]
    NonPositiveTopN { top_n: i64 },

    #[error("no valid documents provided: all {total} were empty or unreadable")]
    NoValidDocuments { total: usize },
}

#[derive(Debug, Error)]
pub enum RerankError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("scoring backend error: {0}")]
    Backend(#[from] BackendError),
}

impl RerankError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, RerankError::InvalidInput(_))
    }

    pub fn invalid_input(&self) -> Option<&InvalidInput> {
        match self {
            RerankError::InvalidInput(e) => Some(e),
            RerankError::Backend(_) => None,
        }
    }
}
