/// block-recorder library
///
/// State store and persistence behind a popup that records code blocks
/// and lets the user reorder, delete and export them.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod storage;

// Re-exports for convenience
pub use config::StoreConfig;
pub use core::Model;
pub use db::Database;
pub use error::{RecorderError, Result, StorageError};
pub use storage::{KeyValueStore, MemoryStore};
