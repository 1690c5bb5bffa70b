use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::sessions::PracticeLoopService;
use crate::store::DataStore;

/// Assembles the loaded data store and the practice loop for the app.
#[derive(Clone)]
pub struct AppServices {
    store: DataStore,
    practice: PracticeLoopService,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails. Unreadable
    /// stored data is replaced by defaults instead.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock).await)
    }

    /// Build services on top of an existing storage handle.
    pub async fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let store = DataStore::load(Arc::clone(&storage.data)).await;
        Self {
            store,
            practice: PracticeLoopService::new(clock),
        }
    }

    #[must_use]
    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DataStore {
        &mut self.store
    }

    /// Split into the practice loop and a mutable store, for callers that
    /// need both at once.
    pub fn parts_mut(&mut self) -> (PracticeLoopService, &mut DataStore) {
        (self.practice, &mut self.store)
    }
}
