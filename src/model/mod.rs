//! Cross-encoder model layer.
//!
//! - [`InferenceBackend`] is the capability the scoring pipeline consumes.
//! - [`CrossEncoder`] implements it with a candle BERT classifier, or with a
//!   deterministic lexical stub when no model directory is configured.
//! - [`MockBackend`] scripts logits for tests.

pub mod backend;
/// BERT sequence classifier used by the cross-encoder.
pub mod bert;
pub mod config;
pub mod cross_encoder;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod stub;
/// Tokenizer loading helpers.
pub mod utils;


pub use backend::{EncodedBatch, EncodedPair, InferenceBackend};
pub use config::{MAX_SEQ_LEN, ModelConfig};
pub use cross_encoder::CrossEncoder;
pub use error::BackendError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockBackend;
