//! Encoding of typed collections into storage documents.
//!
//! Every collection is stored as a JSON array under its own key. Documents
//! carry a schema version; anything that fails to decode is reported as a
//! [`CorruptDocument`] instead of being silently dropped or defaulted.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::repositories::document::StoredDocument;

/// Layout written by this build. Version 1 is a bare JSON array.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

#[derive(Debug, Error)]
#[error("Corrupt document '{key}': {reason}")]
pub struct CorruptDocument {
    pub key: String,
    pub reason: String,
}

impl CorruptDocument {
    pub fn new(key: &str, reason: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Brings an older document layout up to [`CURRENT_SCHEMA_VERSION`].
fn upgrade(
    key: &str,
    version: i32,
    value: serde_json::Value,
) -> Result<serde_json::Value, CorruptDocument> {
    match version {
        CURRENT_SCHEMA_VERSION => Ok(value),
        v if v > CURRENT_SCHEMA_VERSION => Err(CorruptDocument::new(
            key,
            format!("written by schema version {v}, newest supported is {CURRENT_SCHEMA_VERSION}"),
        )),
        v => Err(CorruptDocument::new(
            key,
            format!("unknown schema version {v}"),
        )),
    }
}

pub fn decode_value(key: &str, doc: &StoredDocument) -> Result<serde_json::Value, CorruptDocument> {
    let value: serde_json::Value = serde_json::from_str(&doc.value)
        .map_err(|e| CorruptDocument::new(key, format!("invalid JSON: {e}")))?;
    upgrade(key, doc.schema_version, value)
}

pub fn decode_collection<T: DeserializeOwned>(
    key: &str,
    doc: &StoredDocument,
) -> Result<Vec<T>, CorruptDocument> {
    let serde_json::Value::Array(items) = decode_value(key, doc)? else {
        return Err(CorruptDocument::new(key, "expected a JSON array"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|e| CorruptDocument::new(key, format!("entry {index}: {e}")))
        })
        .collect()
}

pub fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, CorruptDocument> {
    serde_json::to_string(value)
        .map_err(|e| CorruptDocument::new(key, format!("failed to encode: {e}")))
}
