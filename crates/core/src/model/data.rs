use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{SessionResults, SessionTemplate, Settings};

/// Payload schema tag. Payloads carrying any other version are rejected
/// and replaced by defaults; there is no migration between versions.
pub const SCHEMA_VERSION: &str = "v2.0.0";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DataError {
    #[error("{collection} index {index} out of range (len {len})")]
    IndexOutOfRange {
        collection: &'static str,
        index: usize,
        len: usize,
    },
}

/// Everything the application persists: history, templates and settings.
///
/// Updates are copy-on-write: every operation consumes the value and
/// returns the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedData {
    pub version: String,
    pub history: Vec<SessionResults>,
    pub templates: Vec<SessionTemplate>,
    pub settings: Settings,
}

impl Default for PersistedData {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION.to_owned(),
            history: Vec::new(),
            templates: Vec::new(),
            settings: Settings::default(),
        }
    }
}

fn check_index(collection: &'static str, index: usize, len: usize) -> Result<(), DataError> {
    if index < len {
        Ok(())
    } else {
        Err(DataError::IndexOutOfRange {
            collection,
            index,
            len,
        })
    }
}

impl PersistedData {
    #[must_use]
    pub fn is_current_version(&self) -> bool {
        self.version == SCHEMA_VERSION
    }

    #[must_use]
    pub fn with_result(mut self, results: SessionResults) -> Self {
        self.history.push(results);
        self
    }

    /// Remove a history entry by index.
    ///
    /// # Errors
    ///
    /// Returns `DataError::IndexOutOfRange` for an unknown index.
    pub fn without_result(mut self, index: usize) -> Result<Self, DataError> {
        check_index("history", index, self.history.len())?;
        self.history.remove(index);
        Ok(self)
    }

    #[must_use]
    pub fn with_template(mut self, template: SessionTemplate) -> Self {
        self.templates.push(template);
        self
    }

    /// Remove a template by index.
    ///
    /// # Errors
    ///
    /// Returns `DataError::IndexOutOfRange` for an unknown index.
    pub fn without_template(mut self, index: usize) -> Result<Self, DataError> {
        check_index("templates", index, self.templates.len())?;
        self.templates.remove(index);
        Ok(self)
    }

    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SessionOptions, SessionType};
    use crate::time::fixed_now;

    fn results(ty: SessionType) -> SessionResults {
        SessionResults::new(fixed_now(), ty, 1_000, 4, None).unwrap()
    }

    #[test]
    fn default_data_is_current_and_empty() {
        let data = PersistedData::default();
        assert!(data.is_current_version());
        assert!(data.history.is_empty());
        assert!(data.templates.is_empty());
    }

    #[test]
    fn history_entries_are_removed_by_index() {
        let data = PersistedData::default()
            .with_result(results(SessionType::Add))
            .with_result(results(SessionType::Mix));

        let data = data.without_result(0).unwrap();
        assert_eq!(data.history.len(), 1);
        assert_eq!(data.history[0].session_type(), SessionType::Mix);

        let err = data.without_result(3).unwrap_err();
        assert_eq!(
            err,
            DataError::IndexOutOfRange {
                collection: "history",
                index: 3,
                len: 1
            }
        );
    }

    #[test]
    fn templates_are_added_and_removed() {
        let template = SessionTemplate::new("squares", SessionOptions::default_for(SessionType::Sqr));
        let data = PersistedData::default().with_template(template.clone());
        assert_eq!(data.templates, vec![template]);
        assert!(data.without_template(0).unwrap().templates.is_empty());
    }
}
