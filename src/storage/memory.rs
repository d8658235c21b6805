//! In-process key-value store

use super::KeyValueStore;
use crate::db::{StorageItems, StorageKey};
use crate::error::StorageError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Key-value store kept in memory
///
/// Reads and writes can be made to fail, which is how callers exercise
/// the storage error path without a broken disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<StorageItems>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given persisted record
    pub fn with_items(items: StorageItems) -> Self {
        Self {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Copy of everything currently persisted
    pub fn contents(&self) -> StorageItems {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StorageItems> {
        // A poisoned lock still holds a consistent record: writes replace whole keys.
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[StorageKey]) -> Result<StorageItems, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("read refused".to_string()));
        }
        Ok(self.lock().select(keys))
    }

    async fn set(&self, items: StorageItems) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("write refused".to_string()));
        }
        self.lock().merge(items);
        Ok(())
    }
}
