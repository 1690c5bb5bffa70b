use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tracing::debug;

use crate::repository::{DataRepository, StorageError};

use super::SqliteRepository;

#[async_trait]
impl DataRepository for SqliteRepository {
    async fn load_payload(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT payload
            FROM practice_data
            WHERE key = ?1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payload: String = row
            .try_get("payload")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok(Some(payload))
    }

    async fn save_payload(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO practice_data (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        debug!(key, bytes = payload.len(), "stored practice payload");
        Ok(())
    }
}
