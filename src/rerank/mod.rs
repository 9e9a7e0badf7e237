//! The scoring pipeline.
//!
//! ```text
//! request ─► sanitize ─► build_pairs ─► ScoringEngine::score ─► assemble ─► ResultSet
//!            (IndexMap)                  (only blocking step)    (stable sort, top-N)
//! ```
//!
//! Every stage is a pure function of its inputs except scoring, which calls
//! the injected [`InferenceBackend`]. Caller errors are reported before the
//! backend is touched, in this order: empty query, empty document list,
//! non-positive `top_n`, no valid documents.

pub mod assemble;
pub mod engine;
pub mod error;
pub mod pairs;
pub mod sanitize;
pub mod types;


pub use assemble::{assemble, validate_top_n};
pub use engine::{ScoringEngine, logit_to_score};
pub use error::{InvalidInput, RerankError};
pub use pairs::build_pairs;
pub use sanitize::sanitize;
pub use types::{IndexMap, Pair, ResultSet, SanitizedInput, ScoredResult, ValidDocument, ValidQuery};

use std::time::Instant;

use tracing::{debug, info};

use crate::model::InferenceBackend;

/// Runs every caller-input check without touching the backend.
pub fn prepare<D: AsRef<[u8]>>(
    query: &str,
    documents: &[D],
    top_n: i64,
) -> Result<SanitizedInput, RerankError> {
    let query = sanitize::sanitize_query(query)?;
    sanitize::ensure_documents(documents)?;
    validate_top_n(top_n)?;
    let (valid, index_map) = sanitize::filter_documents(documents)?;

    debug!(
        valid = valid.len(),
        dropped = documents.len() - valid.len(),
        "Sanitized rerank input"
    );

    Ok(SanitizedInput {
        query,
        documents: valid,
        index_map,
    })
}

/// Runs the full pipeline against one backend handle.
#[derive(Debug)]
pub struct Reranker<B> {
    engine: ScoringEngine<B>,
}

impl<B: InferenceBackend> Reranker<B> {
    pub fn new(backend: B) -> Self {
        Self {
            engine: ScoringEngine::new(backend),
        }
    }

    pub fn engine(&self) -> &ScoringEngine<B> {
        &self.engine
    }

    pub fn backend(&self) -> &B {
        self.engine.backend()
    }

    /// Sanitizes, scores and ranks `documents` against `query`.
    pub fn rerank<D: AsRef<[u8]>>(
        &self,
        query: &str,
        documents: &[D],
        top_n: i64,
    ) -> Result<ResultSet, RerankError> {
        let input = prepare(query, documents, top_n)?;
        self.score_prepared(&input, top_n)
    }

    /// Scores an already sanitized input and assembles the top `top_n`.
    pub fn score_prepared(
        &self,
        input: &SanitizedInput,
        top_n: i64,
    ) -> Result<ResultSet, RerankError> {
        let started = Instant::now();

        let pairs = build_pairs(&input.query, &input.documents);
        let scores = self.engine.score(&pairs)?;
        let results = assemble(scores, &input.index_map, top_n)?;

        info!(
            documents = input.documents.len(),
            returned = results.len(),
            top_score = results.top().map(|r| r.score),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Reranking completed"
        );

        Ok(results)
    }
}
