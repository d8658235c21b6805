/// Database module for block-recorder
///
/// Persists the popup state in a SQLite key-value table using sqlx.
/// Implements connection pooling for performance.

pub mod connection;
pub mod models;
pub mod queries;

pub use connection::Database;
pub use models::*;
