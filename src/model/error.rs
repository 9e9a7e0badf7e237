use std::path::PathBuf;
use thiserror::Error;

/// Failures of the scoring backend (model load, tokenization, inference).
///
/// None of these are recovered locally: they surface to the caller as an
/// internal failure.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("cross-encoder model not found at path: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load cross-encoder model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("{device} device unavailable: {reason}")]
    DeviceUnavailable { device: String, reason: String },

    #[error("cross-encoder inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid model configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<candle_core::Error> for BackendError {
    fn from(err: candle_core::Error) -> Self {
        BackendError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
