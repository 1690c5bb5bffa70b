//! Text encoding of [`PersistedData`] and the schema-version gate.
//!
//! A payload is the JSON document wrapped in standard base64 so it can be
//! copied around as a single line of text (export/import).

use base64::{Engine, engine::general_purpose::STANDARD};
use drill_core::model::{PersistedData, SCHEMA_VERSION};
use thiserror::Error;
use tracing::debug;

use crate::repository::StorageError;

/// Why a payload could not be loaded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// The text is not base64-wrapped JSON.
    #[error("corrupt payload: {0}")]
    Corrupt(String),

    /// The JSON is readable but carries another schema version or fails
    /// structural validation.
    #[error("invalid persisted data: {0}")]
    Invalid(String),
}

/// Result of reading a payload. The caller decides what to do with a
/// rejected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(PersistedData),
    Invalid(DecodeError),
}

impl LoadOutcome {
    /// # Errors
    ///
    /// Returns the `DecodeError` of a rejected payload.
    pub fn into_result(self) -> Result<PersistedData, DecodeError> {
        match self {
            LoadOutcome::Loaded(data) => Ok(data),
            LoadOutcome::Invalid(err) => Err(err),
        }
    }
}

/// Encode data as a single-line text payload.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the data cannot be serialized.
pub fn encode(data: &PersistedData) -> Result<String, StorageError> {
    let json = serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))?;
    Ok(STANDARD.encode(json))
}

/// Decode a text payload, rejecting other schema versions.
#[must_use]
pub fn decode(text: &str) -> LoadOutcome {
    match decode_inner(text.trim()) {
        Ok(data) => LoadOutcome::Loaded(data),
        Err(err) => {
            debug!(error = %err, "payload rejected");
            LoadOutcome::Invalid(err)
        }
    }
}

fn decode_inner(text: &str) -> Result<PersistedData, DecodeError> {
    let bytes = STANDARD
        .decode(text)
        .map_err(|e| DecodeError::Corrupt(e.to_string()))?;
    let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| DecodeError::Corrupt(e.to_string()))?;

    match value.get("version").and_then(serde_json::Value::as_str) {
        Some(SCHEMA_VERSION) => {}
        Some(other) => {
            return Err(DecodeError::Invalid(format!(
                "schema version {other}, expected {SCHEMA_VERSION}"
            )));
        }
        None => return Err(DecodeError::Invalid("missing schema version".to_owned())),
    }

    serde_json::from_value(value).map_err(|e| DecodeError::Invalid(e.to_string()))
}
