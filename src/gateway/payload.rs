use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// Body of `POST /rerank`.
///
/// `top_n` is signed so that zero and negative values reach validation and
/// are rejected as invalid input rather than as a malformed body.
#[derive(Debug, Clone, Deserialize)]
pub struct RerankRequest {
    pub query: String,
    pub documents: Vec<RawDocument>,
    pub top_n: i64,
}

/// A document string exactly as it arrived on the wire.
///
/// Read through `deserialize_bytes`, so a JSON string that is not valid
/// Unicode (e.g. a lone `\ud800` escape) still parses. It keeps its slot in
/// the list and is dropped later by the sanitizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument(Vec<u8>);

impl RawDocument {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for RawDocument {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for RawDocument {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl<'de> Deserialize<'de> for RawDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RawDocumentVisitor;

        impl Visitor<'_> for RawDocumentVisitor {
            type Value = RawDocument;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a document string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(RawDocument(v.as_bytes().to_vec()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(RawDocument(v.into_bytes()))
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                Ok(RawDocument(v.to_vec()))
            }

            fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
                Ok(RawDocument(v))
            }
        }

        deserializer.deserialize_bytes(RawDocumentVisitor)
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub model_mode: &'static str,
    pub max_concurrent_inferences: usize,
}
