use std::sync::Arc;

use super::error::BackendError;
use crate::rerank::Pair;

/// Token ids, segment ids and attention mask for a single (query, document)
/// pair, before batch padding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedPair {
    pub ids: Vec<u32>,
    pub type_ids: Vec<u32>,
    pub attention_mask: Vec<u32>,
}

impl EncodedPair {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A tokenized batch, padded so every row has `seq_len` entries.
///
/// Stored row-major so it can be handed to a tensor constructor without
/// another copy. Padding positions carry id 0, segment 0 and mask 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBatch {
    input_ids: Vec<u32>,
    type_ids: Vec<u32>,
    attention_mask: Vec<u32>,
    batch_size: usize,
    seq_len: usize,
}

impl EncodedBatch {
    /// Pads `rows` to the longest row.
    pub fn pad(rows: Vec<EncodedPair>) -> Self {
        let batch_size = rows.len();
        let seq_len = rows.iter().map(EncodedPair::len).max().unwrap_or(0);

        let mut input_ids = Vec::with_capacity(batch_size * seq_len);
        let mut type_ids = Vec::with_capacity(batch_size * seq_len);
        let mut attention_mask = Vec::with_capacity(batch_size * seq_len);

        for row in rows {
            let fill = seq_len - row.len();
            input_ids.extend(row.ids);
            input_ids.extend(std::iter::repeat_n(0, fill));
            type_ids.extend(row.type_ids);
            type_ids.extend(std::iter::repeat_n(0, fill));
            attention_mask.extend(row.attention_mask);
            attention_mask.extend(std::iter::repeat_n(0, fill));
        }

        Self {
            input_ids,
            type_ids,
            attention_mask,
            batch_size,
            seq_len,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    pub fn input_ids(&self) -> &[u32] {
        &self.input_ids
    }

    pub fn type_ids(&self) -> &[u32] {
        &self.type_ids
    }

    pub fn attention_mask(&self) -> &[u32] {
        &self.attention_mask
    }

    /// Iterates `(ids, type_ids, attention_mask)` per row.
    pub fn rows(&self) -> impl Iterator<Item = (&[u32], &[u32], &[u32])> {
        let width = self.seq_len.max(1);
        self.input_ids
            .chunks(width)
            .zip(self.type_ids.chunks(width))
            .zip(self.attention_mask.chunks(width))
            .map(|((ids, types), mask)| (ids, types, mask))
    }

    /// `true` when tokenization produced nothing but zero ids.
    pub fn is_degenerate(&self) -> bool {
        self.input_ids.iter().all(|&id| id == 0)
    }
}

/// The model capability consumed by the scoring engine.
///
/// `encode` applies the fixed tokenization contract (per-pair truncation to
/// the model's maximum sequence length, padding to the longest pair in the
/// batch). `infer` returns one raw logit per row, in row order.
///
/// Implementations must be safe to call concurrently from several requests
/// and must not mutate model or tokenizer state.
pub trait InferenceBackend: Send + Sync {
    fn encode(&self, pairs: &[Pair<'_>]) -> Result<EncodedBatch, BackendError>;

    fn infer(&self, batch: &EncodedBatch) -> Result<Vec<f32>, BackendError>;

    /// `true` for backends that do not run a real model.
    fn is_stub(&self) -> bool {
        false
    }
}

impl<B: InferenceBackend + ?Sized> InferenceBackend for Arc<B> {
    fn encode(&self, pairs: &[Pair<'_>]) -> Result<EncodedBatch, BackendError> {
        (**self).encode(pairs)
    }

    fn infer(&self, batch: &EncodedBatch) -> Result<Vec<f32>, BackendError> {
        (**self).infer(batch)
    }

    fn is_stub(&self) -> bool {
        (**self).is_stub()
    }
}
