//! Error types for store operations.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The backing store could not be opened or accessed.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Native DB error inside a transaction.
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A record failed validation before commit.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Schema migration failed or was refused.
    #[error("Migration error: {0}")]
    Migration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;
