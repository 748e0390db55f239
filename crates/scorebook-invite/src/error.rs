//! Error types for the invitation protocol.

use thiserror::Error;

/// Errors that can occur while issuing or resolving join tokens.
///
/// Token errors are user-facing but recoverable: the user can request a
/// fresh link or fall back to entering the code by hand.
#[derive(Debug, Error)]
pub enum Error {
    /// The token could not be parsed.
    #[error("Malformed join token")]
    Malformed,

    /// The token is past its validity window.
    #[error("Join token has expired")]
    Expired,

    /// No group matches the invite code.
    #[error("No group matches the invite code")]
    NotFound,

    /// The code does not match the group the token claims.
    #[error("Invite code does not match the resolved group")]
    SecurityMismatch,

    /// No unique invite code could be generated.
    #[error("Could not generate a unique invite code")]
    CodeSpace,

    /// Record store error.
    #[error("Store error: {0}")]
    Store(#[from] scorebook_db::Error),
}

/// Result type for invitation operations.
pub type Result<T> = std::result::Result<T, Error>;
