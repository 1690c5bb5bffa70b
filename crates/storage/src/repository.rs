use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Blob store for encoded practice data.
///
/// Payloads are opaque text keyed by schema version, so data written by an
/// incompatible release is never read back under the current key.
#[async_trait]
pub trait DataRepository: Send + Sync {
    /// Fetch the payload stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read. A missing
    /// payload is `Ok(None)`.
    async fn load_payload(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the payload stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the payload cannot be written.
    async fn save_payload(&self, key: &str, payload: &str) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    payloads: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            payloads: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl DataRepository for InMemoryRepository {
    async fn load_payload(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .payloads
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn save_payload(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        let mut guard = self
            .payloads
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), payload.to_owned());
        Ok(())
    }
}

/// Repository handle behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub data: Arc<dyn DataRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let data: Arc<dyn DataRepository> = Arc::new(InMemoryRepository::new());
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_payload_is_none() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_payload("v2.0.0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn payloads_are_replaced_per_key() {
        let repo = InMemoryRepository::new();
        repo.save_payload("v2.0.0", "first").await.unwrap();
        repo.save_payload("v2.0.0", "second").await.unwrap();
        repo.save_payload("v1.0.0", "old").await.unwrap();

        assert_eq!(
            repo.load_payload("v2.0.0").await.unwrap().as_deref(),
            Some("second")
        );
        assert_eq!(repo.load_payload("v1.0.0").await.unwrap().as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn storage_clones_share_the_backend() {
        let storage = Storage::in_memory();
        let other = storage.clone();
        storage.data.save_payload("k", "v").await.unwrap();
        assert_eq!(other.data.load_payload("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn poisoned_backend_reports_connection_error() {
        let repo = InMemoryRepository::new();
        let payloads = Arc::clone(&repo.payloads);
        let _ = std::thread::spawn(move || {
            let _guard = payloads.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let err = repo.load_payload("v2.0.0").await.unwrap_err();
        assert!(matches!(err, StorageError::Connection(_)));
        assert!(err.to_string().starts_with("connection error"));
        assert!(matches!(
            repo.save_payload("v2.0.0", "x").await,
            Err(StorageError::Connection(_))
        ));
    }
}
