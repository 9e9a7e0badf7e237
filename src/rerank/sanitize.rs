use tracing::debug;

use super::error::InvalidInput;
use super::types::{IndexMap, SanitizedInput, ValidDocument, ValidQuery};

/// Validates the query and filters the document list.
///
/// Documents that are not UTF-8, blank after trimming, or made only of
/// control / replacement characters are dropped; every survivor keeps its
/// original position in the returned [`IndexMap`].
pub fn sanitize<D: AsRef<[u8]>>(
    query: &str,
    documents: &[D],
) -> Result<SanitizedInput, InvalidInput> {
    let query = sanitize_query(query)?;
    ensure_documents(documents)?;
    let (documents, index_map) = filter_documents(documents)?;

    Ok(SanitizedInput {
        query,
        documents,
        index_map,
    })
}

pub fn sanitize_query(query: &str) -> Result<ValidQuery, InvalidInput> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(InvalidInput::EmptyQuery);
    }
    Ok(ValidQuery::new_unchecked(trimmed.to_string()))
}

pub fn ensure_documents<D>(documents: &[D]) -> Result<(), InvalidInput> {
    if documents.is_empty() {
        return Err(InvalidInput::EmptyDocuments);
    }
    Ok(())
}

pub fn filter_documents<D: AsRef<[u8]>>(
    documents: &[D],
) -> Result<(Vec<ValidDocument>, IndexMap), InvalidInput> {
    let mut valid = Vec::with_capacity(documents.len());
    let mut index_map = IndexMap::default();

    for (index, raw) in documents.iter().enumerate() {
        match normalize_document(raw.as_ref()) {
            Some(text) => {
                valid.push(ValidDocument::new_unchecked(text));
                index_map.push(index);
            }
            None => debug!(index, "Dropping blank or unreadable document"),
        }
    }

    if valid.is_empty() {
        return Err(InvalidInput::NoValidDocuments {
            total: documents.len(),
        });
    }

    Ok((valid, index_map))
}

/// Returns the canonical text of a document, or `None` if it carries none.
pub fn normalize_document(raw: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(raw).ok()?.trim();
    if !text.chars().any(is_text_char) {
        return None;
    }
    Some(text.to_string())
}

fn is_text_char(c: char) -> bool {
    !c.is_control() && c != char::REPLACEMENT_CHARACTER
}
