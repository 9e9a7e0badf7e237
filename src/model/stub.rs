//! Lexical stand-in for the cross-encoder, used when no model is configured.
//!
//! Words are hashed into a BERT-sized vocabulary so the output has the same
//! shape as a real tokenization (`[CLS] query [SEP] document [SEP]`). The
//! logit is derived from query-term recall and Jaccard overlap between the
//! two segments.

use std::collections::HashSet;

use super::backend::{EncodedBatch, EncodedPair};

pub const CLS_ID: u32 = 101;
pub const SEP_ID: u32 = 102;

const VOCAB_SIZE: u32 = 30_522;
const FIRST_WORD_ID: u32 = 1_000;

/// Logit assigned when the query has no content words.
const NO_QUERY_TERMS_LOGIT: f32 = -4.0;

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "shall",
    "can", "to", "of", "in", "for", "on", "with", "at", "by", "from", "as", "into", "through",
    "during", "before", "after", "above", "below", "between", "under", "again", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "each", "few", "more", "most",
    "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too",
    "very", "just", "and", "but", "if", "or", "because", "until", "while", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "it", "its",
];

fn word_id(word: &str) -> u32 {
    let hash = blake3::hash(word.as_bytes());
    let bytes = hash.as_bytes();
    let raw = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    FIRST_WORD_ID + raw % (VOCAB_SIZE - FIRST_WORD_ID)
}

fn content_ids(text: &str) -> Vec<u32> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !STOP_WORDS.contains(w))
        .map(word_id)
        .collect()
}

/// Encodes one pair, truncating the longer segment first until the pair
/// (including three special tokens) fits in `max_len`.
pub fn encode_pair(query: &str, document: &str, max_len: usize) -> EncodedPair {
    let mut query_ids = content_ids(query);
    let mut doc_ids = content_ids(document);

    let budget = max_len.saturating_sub(3);
    while query_ids.len() + doc_ids.len() > budget {
        if doc_ids.len() >= query_ids.len() {
            doc_ids.pop();
        } else {
            query_ids.pop();
        }
    }

    let first_segment = query_ids.len() + 2;
    let second_segment = doc_ids.len() + 1;

    let mut ids = Vec::with_capacity(first_segment + second_segment);
    ids.push(CLS_ID);
    ids.extend(query_ids);
    ids.push(SEP_ID);
    ids.extend(doc_ids);
    ids.push(SEP_ID);

    let mut type_ids = vec![0; first_segment];
    type_ids.extend(std::iter::repeat_n(1, second_segment));

    let attention_mask = vec![1; ids.len()];

    EncodedPair {
        ids,
        type_ids,
        attention_mask,
    }
}

/// One lexical-overlap logit per batch row.
pub fn logits(batch: &EncodedBatch) -> Vec<f32> {
    batch
        .rows()
        .take(batch.batch_size())
        .map(|(ids, types, mask)| {
            let mut query_terms = HashSet::new();
            let mut doc_terms = HashSet::new();
            for ((&id, &segment), &attended) in ids.iter().zip(types).zip(mask) {
                if attended == 0 || id == CLS_ID || id == SEP_ID || id == 0 {
                    continue;
                }
                if segment == 0 {
                    query_terms.insert(id);
                } else {
                    doc_terms.insert(id);
                }
            }
            overlap_logit(&query_terms, &doc_terms)
        })
        .collect()
}

fn overlap_logit(query_terms: &HashSet<u32>, doc_terms: &HashSet<u32>) -> f32 {
    if query_terms.is_empty() {
        return NO_QUERY_TERMS_LOGIT;
    }

    let matches = query_terms.intersection(doc_terms).count() as f32;
    let recall = matches / query_terms.len() as f32;
    let union = query_terms.union(doc_terms).count() as f32;
    let jaccard = if union > 0.0 { matches / union } else { 0.0 };

    let relevance = 0.6 * recall + 0.4 * jaccard;
    8.0 * (relevance - 0.5)
}
