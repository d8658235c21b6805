/// SQL query functions for the key-value table
///
/// Every value is stored as JSON text under its storage key.

use crate::db::models::*;
use crate::db::Database;
use crate::error::StorageError;
use crate::storage::KeyValueStore;
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

impl Database {
    /// Read the raw JSON text stored under a key
    pub async fn get_raw(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM storage WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(self.pool())
            .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Read the requested keys into a partial record
    ///
    /// # Arguments
    /// * `keys` - Keys to fetch; missing rows come back as `None`
    ///
    /// # Returns
    /// * `Ok(StorageItems)` - The partial record
    /// * `Err(StorageError::Corrupt)` - If a stored value is not valid JSON for its key
    ///
    /// A `null` value reads as absent, and so does a status outside the
    /// known set: callers fall back to their defaults for both.
    pub async fn get_items(&self, keys: &[StorageKey]) -> Result<StorageItems, StorageError> {
        let mut items = StorageItems::default();

        for &key in keys {
            let Some(raw) = self.get_raw(key).await? else {
                continue;
            };
            let value: Value = decode(key, &raw)?;
            if value.is_null() {
                continue;
            }
            match key {
                StorageKey::Status => items.status = decode_status(&value),
                StorageKey::CodeBlocks => items.code_blocks = Some(decode_value(key, value)?),
                StorageKey::Settings => items.settings = Some(decode_value(key, value)?),
            }
        }

        Ok(items)
    }

    /// Upsert every key present in `items` in one transaction
    pub async fn set_items(&self, items: &StorageItems) -> Result<(), StorageError> {
        let mut rows: Vec<(StorageKey, String)> = Vec::new();
        if let Some(status) = &items.status {
            rows.push((StorageKey::Status, encode(StorageKey::Status, status)?));
        }
        if let Some(blocks) = &items.code_blocks {
            rows.push((StorageKey::CodeBlocks, encode(StorageKey::CodeBlocks, blocks)?));
        }
        if let Some(settings) = &items.settings {
            rows.push((StorageKey::Settings, encode(StorageKey::Settings, settings)?));
        }

        if rows.is_empty() {
            return Ok(());
        }

        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool().begin().await?;

        for (key, value) in rows {
            sqlx::query(
                r#"
                INSERT INTO storage (key, value, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(key.as_str())
            .bind(value)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Delete every stored key
    pub async fn clear(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM storage").execute(self.pool()).await?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(key: StorageKey, raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|source| StorageError::Corrupt {
        key: key.to_string(),
        source,
    })
}

fn decode_value<T: DeserializeOwned>(key: StorageKey, value: Value) -> Result<T, StorageError> {
    serde_json::from_value(value).map_err(|source| StorageError::Corrupt {
        key: key.to_string(),
        source,
    })
}

fn decode_status(value: &Value) -> Option<RecState> {
    let status = value.as_str().and_then(|s| s.parse::<RecState>().ok());
    if status.is_none() {
        tracing::warn!(stored = %value, "unrecognised status, treating as absent");
    }
    status
}

fn encode<T: Serialize>(key: StorageKey, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })
}

#[async_trait]
impl KeyValueStore for Database {
    async fn get(&self, keys: &[StorageKey]) -> Result<StorageItems, StorageError> {
        self.get_items(keys).await
    }

    async fn set(&self, items: StorageItems) -> Result<(), StorageError> {
        self.set_items(&items).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get_items() {
        let db = Database::new_test().await.unwrap();
        let blocks = vec![Block::new("cy.visit('/')"), Block::new("cy.get('#go').click()")];

        db.set_items(&StorageItems {
            status: Some(RecState::On),
            code_blocks: Some(blocks.clone()),
            settings: Some(Settings::default()),
        })
        .await
        .unwrap();

        let items = db.get_items(&StorageKey::ALL).await.unwrap();
        assert_eq!(items.status, Some(RecState::On));
        assert_eq!(items.code_blocks, Some(blocks));
        assert_eq!(items.settings, Some(Settings::default()));
    }

    #[tokio::test]
    async fn test_absent_keys_are_none() {
        let db = Database::new_test().await.unwrap();

        let items = db.get_items(&StorageKey::ALL).await.unwrap();
        assert_eq!(items, StorageItems::default());
    }

    #[tokio::test]
    async fn test_partial_write_keeps_other_keys() {
        let db = Database::new_test().await.unwrap();

        db.set_items(&StorageItems {
            status: Some(RecState::Paused),
            code_blocks: Some(vec![Block::new("a")]),
            settings: None,
        })
        .await
        .unwrap();

        db.set_items(&StorageItems {
            code_blocks: Some(Vec::new()),
            ..Default::default()
        })
        .await
        .unwrap();

        let items = db.get_items(&StorageKey::ALL).await.unwrap();
        assert_eq!(items.status, Some(RecState::Paused));
        assert_eq!(items.code_blocks, Some(Vec::new()));

        let stats = db.stats().await.unwrap();
        assert_eq!(stats.stored_keys, 2);
    }

    #[tokio::test]
    async fn test_status_stored_as_plain_string() {
        let db = Database::new_test().await.unwrap();

        db.set_items(&StorageItems {
            status: Some(RecState::Settings),
            ..Default::default()
        })
        .await
        .unwrap();

        let raw = db.get_raw(StorageKey::Status).await.unwrap();
        assert_eq!(raw.as_deref(), Some("\"settings\""));
    }

    #[tokio::test]
    async fn test_corrupt_value_is_reported() {
        let db = Database::new_test().await.unwrap();

        sqlx::query("INSERT INTO storage (key, value, updated_at) VALUES ('codeBlocks', 'nope', '')")
            .execute(db.pool())
            .await
            .unwrap();

        let result = db.get_items(&[StorageKey::CodeBlocks]).await;
        match result {
            Err(StorageError::Corrupt { key, .. }) => assert_eq!(key, "codeBlocks"),
            _ => panic!("Expected Corrupt error"),
        }
    }

    async fn insert_raw(db: &Database, key: &str, value: &str) {
        sqlx::query("INSERT INTO storage (key, value, updated_at) VALUES (?, ?, '')")
            .bind(key)
            .bind(value)
            .execute(db.pool())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_status_reads_as_absent() {
        let db = Database::new_test().await.unwrap();
        insert_raw(&db, "status", "\"recording\"").await;

        let items = db.get_items(&[StorageKey::Status]).await.unwrap();
        assert_eq!(items.status, None);
    }

    #[tokio::test]
    async fn test_non_string_status_reads_as_absent() {
        let db = Database::new_test().await.unwrap();
        insert_raw(&db, "status", "42").await;

        let items = db.get_items(&[StorageKey::Status]).await.unwrap();
        assert_eq!(items.status, None);
    }

    #[tokio::test]
    async fn test_null_values_read_as_absent() {
        let db = Database::new_test().await.unwrap();
        insert_raw(&db, "status", "null").await;
        insert_raw(&db, "codeBlocks", "null").await;
        insert_raw(&db, "settings", "null").await;

        let items = db.get_items(&StorageKey::ALL).await.unwrap();
        assert_eq!(items, StorageItems::default());
    }

    #[tokio::test]
    async fn test_clear() {
        let db = Database::new_test().await.unwrap();

        db.set_items(&StorageItems {
            status: Some(RecState::Off),
            ..Default::default()
        })
        .await
        .unwrap();
        db.clear().await.unwrap();

        assert_eq!(db.get_raw(StorageKey::Status).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.db");

        let db = Database::new(&path).await.unwrap();
        db.set_items(&StorageItems {
            code_blocks: Some(vec![Block::new("kept")]),
            ..Default::default()
        })
        .await
        .unwrap();
        db.close().await;

        let reopened = Database::new(&path).await.unwrap();
        let items = reopened.get_items(&[StorageKey::CodeBlocks]).await.unwrap();
        assert_eq!(items.code_blocks.unwrap()[0].value, "kept");
    }
}
