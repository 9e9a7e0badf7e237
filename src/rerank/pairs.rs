use super::types::{Pair, ValidDocument, ValidQuery};

/// One pair per document, in document order.
pub fn build_pairs<'a>(query: &'a ValidQuery, documents: &'a [ValidDocument]) -> Vec<Pair<'a>> {
    documents
        .iter()
        .map(|doc| Pair {
            query: query.as_str(),
            document: doc.as_str(),
        })
        .collect()
}
