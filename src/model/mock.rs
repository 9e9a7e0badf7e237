use std::sync::atomic::{AtomicUsize, Ordering};

use super::backend::{EncodedBatch, EncodedPair, InferenceBackend};
use super::error::BackendError;
use crate::rerank::Pair;

#[derive(Debug, Clone)]
enum MockLogits {
    Fixed(Vec<f32>),
    Constant(f32),
}

/// Scripted backend for exercising the scoring pipeline without a model.
#[derive(Debug)]
pub struct MockBackend {
    logits: MockLogits,
    zero_tokens: bool,
    failure: Option<String>,
    encode_calls: AtomicUsize,
    infer_calls: AtomicUsize,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::constant(0.0)
    }
}

impl MockBackend {
    /// Returns `logits` verbatim from every `infer` call.
    pub fn with_logits(logits: Vec<f32>) -> Self {
        Self::from_logits(MockLogits::Fixed(logits))
    }

    /// Returns `logit` for every row.
    pub fn constant(logit: f32) -> Self {
        Self::from_logits(MockLogits::Constant(logit))
    }

    /// Returns NaN for every row.
    pub fn nan() -> Self {
        Self::constant(f32::NAN)
    }

    fn from_logits(logits: MockLogits) -> Self {
        Self {
            logits,
            zero_tokens: false,
            failure: None,
            encode_calls: AtomicUsize::new(0),
            infer_calls: AtomicUsize::new(0),
        }
    }

    /// Makes `encode` produce only zero token ids.
    pub fn with_zero_tokens(mut self) -> Self {
        self.zero_tokens = true;
        self
    }

    /// Makes `infer` fail with `reason`.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    pub fn encode_calls(&self) -> usize {
        self.encode_calls.load(Ordering::SeqCst)
    }

    pub fn infer_calls(&self) -> usize {
        self.infer_calls.load(Ordering::SeqCst)
    }
}

impl InferenceBackend for MockBackend {
    fn encode(&self, pairs: &[Pair<'_>]) -> Result<EncodedBatch, BackendError> {
        self.encode_calls.fetch_add(1, Ordering::SeqCst);

        let rows = pairs
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let ids = if self.zero_tokens {
                    vec![0; 3]
                } else {
                    vec![101, 1_000 + i as u32, 102]
                };
                EncodedPair {
                    ids,
                    type_ids: vec![0, 0, 1],
                    attention_mask: vec![1; 3],
                }
            })
            .collect();

        Ok(EncodedBatch::pad(rows))
    }

    fn infer(&self, batch: &EncodedBatch) -> Result<Vec<f32>, BackendError> {
        self.infer_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(reason) = &self.failure {
            return Err(BackendError::InferenceFailed {
                reason: reason.clone(),
            });
        }

        Ok(match &self.logits {
            MockLogits::Fixed(logits) => logits.clone(),
            MockLogits::Constant(logit) => vec![*logit; batch.batch_size()],
        })
    }

    fn is_stub(&self) -> bool {
        true
    }
}
