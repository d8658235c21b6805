/// Storage configuration
///
/// Resolves where the SQLite mirror of the popup state lives.

use crate::error::{RecorderError, Result};
use std::path::PathBuf;

/// Environment variable overriding the database location
pub const DB_PATH_ENV: &str = "BLOCK_RECORDER_DB";

const APP_DIR: &str = "block-recorder";
const DB_FILE: &str = "storage.db";

/// Where the store keeps its data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            db_path: base.join(APP_DIR).join(DB_FILE),
        }
    }
}

impl StoreConfig {
    /// Default location, overridden by `BLOCK_RECORDER_DB` when set
    pub fn from_env() -> Result<Self> {
        match std::env::var(DB_PATH_ENV) {
            Ok(path) => Self::with_path(path),
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(e) => Err(RecorderError::Config(format!("{}: {}", DB_PATH_ENV, e))),
        }
    }

    /// Explicit database path
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = path.into();
        if db_path.as_os_str().is_empty() {
            return Err(RecorderError::Config("database path is empty".to_string()));
        }
        Ok(Self { db_path })
    }
}
