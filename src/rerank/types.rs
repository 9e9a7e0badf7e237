use serde::{Deserialize, Serialize};

/// A query that is non-empty after trimming. Stored trimmed, so the model
/// sees the trimmed text; leading or trailing whitespace never changes a
/// subword tokenization, so scores match the untrimmed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidQuery(String);

impl ValidQuery {
    pub(crate) fn new_unchecked(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A document that survived sanitization: valid UTF-8, trimmed, and with at
/// least one printable character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDocument(String);

impl ValidDocument {
    pub(crate) fn new_unchecked(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Original (pre-filtering) position of each valid document, in discovery
/// order. Entry `i` belongs to the `i`th valid document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMap(Vec<usize>);

impl IndexMap {
    pub(crate) fn push(&mut self, original_index: usize) {
        self.0.push(original_index);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<usize> {
        self.0.get(position).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

/// Output of the sanitizer. `documents` and `index_map` have equal length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedInput {
    pub query: ValidQuery,
    pub documents: Vec<ValidDocument>,
    pub index_map: IndexMap,
}

/// One (query, document) text pair handed to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair<'a> {
    pub query: &'a str,
    pub document: &'a str,
}

/// A document's original position and its relevance in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub index: usize,
    pub score: f32,
}

/// Results ordered by descending score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet(Vec<ScoredResult>);

impl ResultSet {
    pub(crate) fn new(results: Vec<ScoredResult>) -> Self {
        Self(results)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredResult> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ScoredResult] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<ScoredResult> {
        self.0
    }

    pub fn top(&self) -> Option<&ScoredResult> {
        self.0.first()
    }
}

impl IntoIterator for ResultSet {
    type Item = ScoredResult;
    type IntoIter = std::vec::IntoIter<ScoredResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ScoredResult;
    type IntoIter = std::slice::Iter<'a, ScoredResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
