//! Rerank library crate (used by the server and integration tests).
//!
//! Scores a query against a list of candidate documents with a cross-encoder
//! and returns the best matches, each tagged with its position in the
//! caller's original list.
//!
//! # Modules
//!
//! - [`rerank`]: the pipeline (sanitize, pair, score, assemble).
//! - [`model`]: cross-encoder backends behind [`InferenceBackend`].
//! - [`gateway`]: Axum router exposing `POST /rerank` and the probes.
//! - [`config`]: environment-backed server settings.
//!
//! # Example
//!
//! ```no_run
//! use rerank::{CrossEncoder, Reranker};
//!
//! let reranker = Reranker::new(CrossEncoder::stub()?);
//! let results = reranker.rerank(
//!     "capital of France",
//!     &["Paris is the capital of France.", ""],
//!     5,
//! )?;
//! assert_eq!(results.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Test/Mock Support
//! [`MockBackend`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod gateway;
pub mod model;
pub mod rerank;

pub use config::{Config, ConfigError};
pub use constants::{
    DEFAULT_MAX_CONCURRENT_INFERENCES, FALLBACK_SCORE, LOGIT_CLAMP, MAX_SEQ_LEN,
    RERANK_STATUS_HEADER,
};
pub use gateway::{GatewayError, HandlerState, create_router_with_state};
#[cfg(any(test, feature = "mock"))]
pub use model::MockBackend;
pub use model::{BackendError, CrossEncoder, EncodedBatch, InferenceBackend, ModelConfig};
pub use rerank::{
    IndexMap, InvalidInput, RerankError, Reranker, ResultSet, ScoredResult, ScoringEngine,
};
