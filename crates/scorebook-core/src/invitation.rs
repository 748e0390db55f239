//! Persisted invitation record
//!
//! Distinct from the ephemeral join token: an invitation is a stored row
//! tracking that someone was asked to join a group, with a lifecycle of
//! its own.

use crate::identity::{GroupId, InvitationId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a persisted invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InvitationStatus {
    /// Awaiting a response
    #[default]
    Pending,
    /// Invitee joined the group
    Accepted,
    /// Cancelled by the inviter
    Revoked,
    /// Passed its expiry date
    Expired,
}

/// An invitation to join a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    /// Primary key, immutable once assigned
    pub id: InvitationId,
    /// Group the invitation is for
    pub group_id: GroupId,
    /// Member who issued the invitation
    pub created_by: UserId,
    /// Invited user, if known at issue time
    pub invitee: Option<UserId>,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Invitation {
    /// Create a pending invitation issued now
    pub fn new(id: impl Into<InvitationId>, group_id: GroupId, created_by: UserId) -> Self {
        Self {
            id: id.into(),
            group_id,
            created_by,
            invitee: None,
            status: InvitationStatus::Pending,
            created_at: Utc::now(),
            expires_at: None,
        }
    }

    /// Check expiry against a clock reading
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now > expires_at,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry() {
        let mut inv = Invitation::new("i-1", GroupId::new("g-1"), UserId::new("u-1"));
        let now = Utc::now();
        assert!(!inv.is_expired_at(now));

        inv.expires_at = Some(now - Duration::hours(1));
        assert!(inv.is_expired_at(now));

        inv.expires_at = Some(now + Duration::hours(1));
        assert!(!inv.is_expired_at(now));
    }
}
