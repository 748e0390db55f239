//! Group record, membership and permissions
//!
//! A group owns an invite code and a member list. Deleting a group does
//! not cascade to its players, matches, or invitations; callers remove
//! dependents themselves.

use crate::identity::{GroupId, InviteCode, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Membership role within a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Role {
    /// Can manage members, settings, and the invite code
    Admin,
    /// Regular member
    #[default]
    Member,
}

/// What a member is allowed to do inside the group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub can_edit_matches: bool,
    pub can_manage_players: bool,
    pub can_invite: bool,
}

impl Permissions {
    /// Full permissions, granted to admins
    pub fn admin() -> Self {
        Self {
            can_edit_matches: true,
            can_manage_players: true,
            can_invite: true,
        }
    }

    /// Default member permissions
    pub fn member() -> Self {
        Self {
            can_edit_matches: false,
            can_manage_players: false,
            can_invite: true,
        }
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::member()
    }
}

/// One entry in a group's member list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub user_id: UserId,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
    pub is_active: bool,
    pub permissions: Permissions,
}

impl GroupMember {
    /// A regular member joined now with default permissions
    pub fn member(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Member,
            joined_at: Utc::now(),
            is_active: true,
            permissions: Permissions::member(),
        }
    }

    /// An admin member joined now with full permissions
    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Admin,
            joined_at: Utc::now(),
            is_active: true,
            permissions: Permissions::admin(),
        }
    }
}

/// Per-group settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSettings {
    /// Whether anyone holding the code may join without an invitation record
    pub open_membership: bool,
    /// Default overs per innings for new matches
    pub default_overs: u32,
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            open_membership: true,
            default_overs: 20,
        }
    }
}

/// A community-sports group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Primary key, immutable once assigned
    pub id: GroupId,
    pub name: String,
    pub description: Option<String>,
    /// User who created the group
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub members: Vec<GroupMember>,
    /// Unique across all groups at any point in time
    pub invite_code: InviteCode,
    pub settings: GroupSettings,
}

impl Group {
    /// Create a group with the creator seeded as an active admin member
    pub fn new(
        id: impl Into<GroupId>,
        name: impl Into<String>,
        created_by: UserId,
        invite_code: InviteCode,
    ) -> Self {
        let creator = GroupMember::admin(created_by.clone());
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            created_by,
            created_at: Utc::now(),
            members: vec![creator],
            invite_code,
            settings: GroupSettings::default(),
        }
    }

    /// Check whether a user already appears in the member list
    pub fn has_member(&self, user_id: &UserId) -> bool {
        self.members.iter().any(|m| &m.user_id == user_id)
    }

    /// Count of active members
    pub fn active_member_count(&self) -> usize {
        self.members.iter().filter(|m| m.is_active).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_is_admin_member() {
        let group = Group::new(
            "g-1",
            "Northside CC",
            UserId::new("u-1"),
            InviteCode::new("AB12CD"),
        );
        assert_eq!(group.members.len(), 1);
        assert_eq!(group.members[0].role, Role::Admin);
        assert!(group.members[0].is_active);
        assert!(group.has_member(&UserId::new("u-1")));
        assert!(!group.has_member(&UserId::new("u-2")));
    }

    #[test]
    fn test_permission_defaults() {
        assert!(Permissions::member().can_invite);
        assert!(!Permissions::member().can_edit_matches);
        assert!(Permissions::admin().can_manage_players);
    }
}
