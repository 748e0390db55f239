//! Join token encode/decode.
//!
//! A token is a reversible, URL-safe encoding of
//! `groupId:inviteCode:issuedAtEpochMillis`. It is opaque and unsigned:
//! security rests on code entropy and the short validity window, not
//! cryptography. Expiry is evaluated on every decode; a token is never
//! cached as already validated.

use crate::error::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use scorebook_core::{Group, GroupId, InviteCode};

/// Hours a token stays valid after issue.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// An ephemeral join token. Never persisted.
///
/// Lifecycle: issued, then either consumed within the validity window or
/// expired. There is no revoked state; a token can only be invalidated
/// early by rotating the group's invite code, which breaks resolution for
/// every outstanding token carrying the old code.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinToken {
    pub group_id: GroupId,
    pub invite_code: InviteCode,
    pub issued_at: DateTime<Utc>,
}

impl JoinToken {
    /// Issue a token for a group, valid from now.
    pub fn issue(group: &Group) -> Self {
        Self {
            group_id: group.id.clone(),
            invite_code: group.invite_code.clone(),
            issued_at: Utc::now(),
        }
    }

    /// Encode as an opaque, URL-safe string.
    pub fn encode(&self) -> String {
        let raw = format!(
            "{}:{}:{}",
            self.group_id,
            self.invite_code,
            self.issued_at.timestamp_millis()
        );
        URL_SAFE_NO_PAD.encode(raw)
    }

    /// Decode a token, checking expiry against the current clock.
    pub fn decode(token: &str) -> Result<Self> {
        Self::decode_at(token, Utc::now())
    }

    /// Decode a token, checking expiry against `now`.
    pub fn decode_at(token: &str, now: DateTime<Utc>) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|_| Error::Malformed)?;
        let raw = String::from_utf8(bytes).map_err(|_| Error::Malformed)?;

        // Group ids may contain ':', the code and timestamp never do
        let mut parts = raw.rsplitn(3, ':');
        let millis = parts.next().ok_or(Error::Malformed)?;
        let code = parts.next().ok_or(Error::Malformed)?;
        let group_id = parts.next().ok_or(Error::Malformed)?;
        if group_id.is_empty() || code.is_empty() {
            return Err(Error::Malformed);
        }
        let millis: i64 = millis.parse().map_err(|_| Error::Malformed)?;
        let issued_at = DateTime::from_timestamp_millis(millis).ok_or(Error::Malformed)?;

        let decoded = Self {
            group_id: GroupId::new(group_id),
            invite_code: InviteCode::new(code),
            issued_at,
        };
        if decoded.is_expired_at(now) {
            return Err(Error::Expired);
        }
        Ok(decoded)
    }

    /// Whether the validity window has passed at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.issued_at > Duration::hours(TOKEN_TTL_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorebook_core::UserId;

    fn token_issued(hours_ago: i64) -> JoinToken {
        JoinToken {
            group_id: GroupId::new("g-1"),
            invite_code: InviteCode::new("AB12CD"),
            issued_at: Utc::now() - Duration::hours(hours_ago),
        }
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let group = Group::new(
            "g-1",
            "Test CC",
            UserId::new("u-1"),
            InviteCode::new("AB12CD"),
        );
        let token = JoinToken::issue(&group);
        let decoded = JoinToken::decode(&token.encode()).unwrap();
        assert_eq!(decoded.group_id, token.group_id);
        assert_eq!(decoded.invite_code, token.invite_code);
        assert_eq!(
            decoded.issued_at.timestamp_millis(),
            token.issued_at.timestamp_millis()
        );
    }

    #[test]
    fn test_group_id_with_colons_round_trips() {
        let token = JoinToken {
            group_id: GroupId::new("org:club:42"),
            invite_code: InviteCode::new("AB12CD"),
            issued_at: Utc::now(),
        };
        let decoded = JoinToken::decode(&token.encode()).unwrap();
        assert_eq!(decoded.group_id.as_str(), "org:club:42");
        assert_eq!(decoded.invite_code.as_str(), "AB12CD");
    }

    #[test]
    fn test_expiry_window() {
        let now = Utc::now();
        let fresh = token_issued(23);
        assert!(JoinToken::decode_at(&fresh.encode(), now).is_ok());

        let stale = token_issued(25);
        assert!(matches!(
            JoinToken::decode_at(&stale.encode(), now),
            Err(Error::Expired)
        ));
    }

    #[test]
    fn test_expiry_is_checked_on_every_decode() {
        let token = token_issued(0).encode();
        let now = Utc::now();
        assert!(JoinToken::decode_at(&token, now).is_ok());
        assert!(matches!(
            JoinToken::decode_at(&token, now + Duration::hours(25)),
            Err(Error::Expired)
        ));
    }

    #[test]
    fn test_malformed_tokens() {
        // Not base64
        assert!(matches!(
            JoinToken::decode("!!not-base64!!"),
            Err(Error::Malformed)
        ));
        // Base64 of something that is not a token
        let junk = URL_SAFE_NO_PAD.encode("no separators here");
        assert!(matches!(JoinToken::decode(&junk), Err(Error::Malformed)));
        // Missing fields
        let empty_code = URL_SAFE_NO_PAD.encode("g-1::1700000000000");
        assert!(matches!(
            JoinToken::decode(&empty_code),
            Err(Error::Malformed)
        ));
        // Timestamp is not a number
        let bad_ts = URL_SAFE_NO_PAD.encode("g-1:AB12CD:soon");
        assert!(matches!(JoinToken::decode(&bad_ts), Err(Error::Malformed)));
    }
}
