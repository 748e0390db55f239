//! Identity types for records and invite codes
//!
//! Uses string-based ids so records round-trip through JSON exports and
//! join links unchanged

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new id
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the id as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id! {
    /// Unique identifier for a user account
    UserId
}

string_id! {
    /// Unique identifier for a group
    GroupId
}

string_id! {
    /// Unique identifier for a player
    PlayerId
}

string_id! {
    /// Unique identifier for a match
    MatchId
}

string_id! {
    /// Unique identifier for a persisted invitation
    InvitationId
}

/// Number of characters in an invite code
pub const INVITE_CODE_LEN: usize = 6;

/// A short, human-enterable code identifying a group
///
/// Codes are 6 uppercase alphanumeric characters, unique across all groups
/// at any point in time. The code is the ground truth a join token is
/// checked against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteCode(String);

impl InviteCode {
    /// Wrap an already-valid code without checking it
    ///
    /// Use [`InviteCode::parse`] for user-entered input.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Parse a strictly-valid code: exactly 6 uppercase alphanumerics
    pub fn parse(input: &str) -> Result<Self> {
        if input.len() != INVITE_CODE_LEN
            || !input
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(Error::InvalidInviteCode(input.to_string()));
        }
        Ok(Self(input.to_string()))
    }

    /// Normalize user-entered input: trim whitespace, uppercase
    pub fn normalized(input: &str) -> String {
        input.trim().to_ascii_uppercase()
    }

    /// Get the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InviteCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_ids() {
        let id = GroupId::new("g-42");
        assert_eq!(id.as_str(), "g-42");
        assert_eq!(format!("{}", id), "g-42");
        assert_eq!(GroupId::from("g-42"), id);
    }

    #[test]
    fn test_invite_code_parse() {
        assert!(InviteCode::parse("AB12CD").is_ok());
        assert!(InviteCode::parse("ab12cd").is_err());
        assert!(InviteCode::parse("AB12C").is_err());
        assert!(InviteCode::parse("AB12CDE").is_err());
        assert!(InviteCode::parse("AB 2CD").is_err());
    }

    #[test]
    fn test_invite_code_normalized() {
        assert_eq!(InviteCode::normalized("  ab12cd \n"), "AB12CD");
        assert_eq!(InviteCode::normalized("AB12CD"), "AB12CD");
    }
}
