use std::sync::Arc;

use tracing::{debug, info, warn};

use drill_core::model::{
    PersistedData, SCHEMA_VERSION, SessionResults, SessionTemplate, Settings,
};
use storage::codec::{self, LoadOutcome};
use storage::repository::DataRepository;

use crate::error::DataStoreError;

/// Single owner of the persisted history, templates and settings.
///
/// Edits replace the held value wholesale; nothing reaches the repository
/// until `save` is called.
#[derive(Clone)]
pub struct DataStore {
    repo: Arc<dyn DataRepository>,
    data: PersistedData,
}

impl DataStore {
    /// Read the stored payload, falling back to defaults when it is
    /// missing, unreadable or from another schema version.
    pub async fn load(repo: Arc<dyn DataRepository>) -> Self {
        let data = match repo.load_payload(SCHEMA_VERSION).await {
            Ok(Some(text)) => match codec::decode(&text) {
                LoadOutcome::Loaded(data) => data,
                LoadOutcome::Invalid(err) => {
                    warn!(error = %err, "discarding stored practice data");
                    PersistedData::default()
                }
            },
            Ok(None) => {
                debug!("no stored practice data");
                PersistedData::default()
            }
            Err(err) => {
                warn!(error = %err, "failed to read practice data");
                PersistedData::default()
            }
        };
        Self { repo, data }
    }

    /// Wrap already loaded data.
    #[must_use]
    pub fn with_data(repo: Arc<dyn DataRepository>, data: PersistedData) -> Self {
        Self { repo, data }
    }

    #[must_use]
    pub fn data(&self) -> &PersistedData {
        &self.data
    }

    #[must_use]
    pub fn history(&self) -> &[SessionResults] {
        &self.data.history
    }

    #[must_use]
    pub fn templates(&self) -> &[SessionTemplate] {
        &self.data.templates
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.data.settings
    }

    /// Write the current data. Returns whether the write succeeded.
    pub async fn save(&self) -> bool {
        let text = match codec::encode(&self.data) {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "failed to encode practice data");
                return false;
            }
        };
        match self.repo.save_payload(SCHEMA_VERSION, &text).await {
            Ok(()) => {
                info!(history = self.data.history.len(), "saved practice data");
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to save practice data");
                false
            }
        }
    }

    pub fn record_result(&mut self, results: SessionResults) {
        self.update(|data| data.with_result(results));
    }

    /// # Errors
    ///
    /// Returns `DataStoreError::Data` for an unknown index.
    pub fn remove_result(&mut self, index: usize) -> Result<(), DataStoreError> {
        self.try_update(|data| data.without_result(index))
    }

    pub fn add_template(&mut self, template: SessionTemplate) {
        self.update(|data| data.with_template(template));
    }

    /// # Errors
    ///
    /// Returns `DataStoreError::Data` for an unknown index.
    pub fn remove_template(&mut self, index: usize) -> Result<(), DataStoreError> {
        self.try_update(|data| data.without_template(index))
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.update(|data| data.with_settings(settings));
    }

    /// Drop all history, templates and settings in favor of defaults.
    ///
    /// Like imports, the reset only reaches storage on the next `save`.
    pub fn reset(&mut self) {
        info!(history = self.data.history.len(), "resetting practice data");
        self.data = PersistedData::default();
    }

    /// Encoded copy of the current data for backup or transfer.
    #[must_use]
    pub fn export_text(&self) -> Option<String> {
        match codec::encode(&self.data) {
            Ok(text) => Some(text),
            Err(err) => {
                warn!(error = %err, "failed to export practice data");
                None
            }
        }
    }

    /// Replace the current data with an exported payload.
    ///
    /// Rejected payloads leave the data untouched and return `false`.
    pub fn import_text(&mut self, text: &str) -> bool {
        match codec::decode(text) {
            LoadOutcome::Loaded(data) => {
                info!(history = data.history.len(), "imported practice data");
                self.data = data;
                true
            }
            LoadOutcome::Invalid(err) => {
                warn!(error = %err, "rejected imported practice data");
                false
            }
        }
    }

    fn update(&mut self, f: impl FnOnce(PersistedData) -> PersistedData) {
        let current = std::mem::take(&mut self.data);
        self.data = f(current);
    }

    fn try_update<E>(
        &mut self,
        f: impl FnOnce(PersistedData) -> Result<PersistedData, E>,
    ) -> Result<(), DataStoreError>
    where
        DataStoreError: From<E>,
    {
        self.data = f(self.data.clone())?;
        Ok(())
    }
}
