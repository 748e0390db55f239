//! Error types for scorebook-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid invite code: {0}")]
    InvalidInviteCode(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
