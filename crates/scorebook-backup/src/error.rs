//! Error types for backup and restore.

use thiserror::Error;

/// Errors that can occur in the backup engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A snapshot cannot fit the configured byte budget at any tier.
    #[error("Quota exceeded: {needed} bytes needed against a {budget} byte budget")]
    QuotaExceeded { needed: u64, budget: u64 },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Record store error.
    #[error("Store error: {0}")]
    Store(#[from] scorebook_db::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for backup operations.
pub type Result<T> = std::result::Result<T, Error>;
