//! Key-value storage contract
//!
//! The state store only ever talks to storage through [`KeyValueStore`]:
//! read a set of keys into a partial record, write a partial record back.

pub mod memory;

pub use memory::MemoryStore;

use crate::db::{StorageItems, StorageKey};
use crate::error::StorageError;
use async_trait::async_trait;

/// Backend the state store writes through to
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the requested keys; absent keys come back as `None`
    async fn get(&self, keys: &[StorageKey]) -> Result<StorageItems, StorageError>;

    /// Write every key present in `items`, leaving the others untouched
    async fn set(&self, items: StorageItems) -> Result<(), StorageError>;
}
