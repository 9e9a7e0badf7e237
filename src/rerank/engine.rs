use tracing::{debug, warn};

use super::types::Pair;
use crate::constants::{FALLBACK_SCORE, LOGIT_CLAMP};
use crate::model::{BackendError, InferenceBackend};

/// Turns pairs into probability-like scores via an [`InferenceBackend`].
///
/// Degenerate numeric conditions are absorbed here and never surface as
/// errors:
/// - a batch whose token ids are all zero is not sent to the model; every
///   pair scores [`FALLBACK_SCORE`];
/// - a model output that is entirely NaN scores every pair
///   [`FALLBACK_SCORE`];
/// - each logit is clamped to `[-LOGIT_CLAMP, LOGIT_CLAMP]` before the
///   sigmoid, and any non-finite result is replaced by [`FALLBACK_SCORE`].
///
/// Backend failures propagate unchanged. There are no retries.
#[derive(Debug)]
pub struct ScoringEngine<B> {
    backend: B,
}

impl<B: InferenceBackend> ScoringEngine<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Scores `pairs`, returning exactly `pairs.len()` values in pair order.
    pub fn score(&self, pairs: &[Pair<'_>]) -> Result<Vec<f32>, BackendError> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let batch = self.backend.encode(pairs)?;
        if batch.batch_size() != pairs.len() {
            return Err(BackendError::TokenizationFailed {
                reason: format!(
                    "encoded {} rows for {} pairs",
                    batch.batch_size(),
                    pairs.len()
                ),
            });
        }

        if batch.is_degenerate() {
            warn!(
                pairs = pairs.len(),
                "Invalid tokenization: all input ids are zero, skipping inference"
            );
            return Ok(vec![FALLBACK_SCORE; pairs.len()]);
        }

        let logits = self.backend.infer(&batch)?;
        if logits.len() != pairs.len() {
            return Err(BackendError::InferenceFailed {
                reason: format!(
                    "model returned {} logits for {} pairs",
                    logits.len(),
                    pairs.len()
                ),
            });
        }

        if logits.iter().all(|l| l.is_nan()) {
            warn!(pairs = pairs.len(), "All logits are NaN, returning zero scores");
            return Ok(vec![FALLBACK_SCORE; pairs.len()]);
        }

        let scores: Vec<f32> = logits.into_iter().map(logit_to_score).collect();
        debug!(?scores, "Processed scores");
        Ok(scores)
    }
}

/// Clamped sigmoid with non-finite results mapped to [`FALLBACK_SCORE`].
pub fn logit_to_score(logit: f32) -> f32 {
    let clamped = logit.clamp(-LOGIT_CLAMP, LOGIT_CLAMP);
    let score = 1.0 / (1.0 + (-clamped).exp());
    if score.is_finite() {
        score
    } else {
        FALLBACK_SCORE
    }
}
