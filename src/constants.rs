//! Cross-cutting, shared constants.
//!
//! The numeric limits here are part of the scoring contract: changing them
//! changes observable scores.

/// Maximum tokens per (query, document) pair after truncation.
pub const MAX_SEQ_LEN: usize = 512;

/// Logits are clamped to `[-LOGIT_CLAMP, LOGIT_CLAMP]` before the sigmoid.
pub const LOGIT_CLAMP: f32 = 100.0;

/// Score substituted for degenerate inputs (all-zero tokens, NaN logits).
pub const FALLBACK_SCORE: f32 = 0.0;

/// Default number of inference calls allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENT_INFERENCES: usize = 4;

pub const RERANK_STATUS_HEADER: &str = "X-Rerank-Status";
pub const RERANK_STATUS_OK: &str = "ok";
pub const RERANK_STATUS_HEALTHY: &str = "healthy";
pub const RERANK_STATUS_INVALID_REQUEST: &str = "invalid_request";
pub const RERANK_STATUS_SCORING_ERROR: &str = "scoring_error";
pub const RERANK_STATUS_INTERNAL_ERROR: &str = "internal_error";
