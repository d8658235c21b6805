/// Error types for block-recorder
///
/// Every failure of the state store originates at the storage boundary,
/// except index validation on the ordered block list.
/// Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Failure reported by a key-value backend on a read or write
#[derive(Error, Debug)]
pub enum StorageError {
    /// SQLite backend errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (creating the storage directory, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted value could not be decoded
    #[error("Stored value for '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded for writing
    #[error("Could not encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backend refused the operation
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Main error type for block-recorder operations
#[derive(Error, Debug)]
pub enum RecorderError {
    /// Read or write-through against the key-value store failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Index outside the block list
    #[error("Block index {index} is out of bounds for a list of {len} blocks")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Clipboard rejected the exported text
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for block-recorder operations
pub type Result<T> = std::result::Result<T, RecorderError>;

impl From<sqlx::Error> for RecorderError {
    fn from(err: sqlx::Error) -> Self {
        RecorderError::Storage(StorageError::Database(err))
    }
}

impl From<std::io::Error> for RecorderError {
    fn from(err: std::io::Error) -> Self {
        RecorderError::Storage(StorageError::Io(err))
    }
}

impl RecorderError {
    /// True when the failure came from the key-value store
    pub fn is_storage(&self) -> bool {
        matches!(self, RecorderError::Storage(_))
    }

    /// Convert RecorderError to a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            RecorderError::Storage(StorageError::Database(e)) => {
                format!("Could not save recorded blocks. Please try again. Details: {}", e)
            }
            RecorderError::Storage(StorageError::Io(e)) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            RecorderError::Storage(StorageError::Corrupt { key, .. }) => {
                format!("Saved '{}' data is unreadable. Reset the recording to continue.", key)
            }
            RecorderError::Storage(StorageError::Encode { key, .. }) => {
                format!("Could not save '{}': the value has no stored form.", key)
            }
            RecorderError::Storage(StorageError::Unavailable(msg)) => {
                format!("Storage is unavailable: {}", msg)
            }
            RecorderError::IndexOutOfBounds { index, len } => {
                format!("There is no block at position {} ({} recorded)", index, len)
            }
            RecorderError::Clipboard(msg) => {
                format!("Could not copy the recorded blocks: {}", msg)
            }
            RecorderError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
            RecorderError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_user_messages() {
        let err = RecorderError::IndexOutOfBounds { index: 4, len: 2 };
        assert!(err.user_message().contains("position 4"));

        let err = RecorderError::Storage(StorageError::Unavailable("quota".to_string()));
        assert!(err.user_message().contains("quota"));
    }

    #[test]
    fn test_error_display() {
        let err = RecorderError::Storage(StorageError::Unavailable("offline".to_string()));
        let display = format!("{}", err);
        assert!(display.contains("Storage error"));
        assert!(display.contains("offline"));
    }

    #[test]
    fn test_encode_error_is_not_reported_as_corrupt() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = RecorderError::Storage(StorageError::Encode {
            key: "settings".to_string(),
            source,
        });

        assert!(err.to_string().contains("Could not encode value for 'settings'"));
        assert!(!err.to_string().contains("corrupt"));
        assert!(!err.user_message().contains("unreadable"));
    }

    #[test]
    fn test_is_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(RecorderError::from(io).is_storage());
        assert!(!RecorderError::IndexOutOfBounds { index: 0, len: 0 }.is_storage());
    }
}
