//! Stored models for user, group, and player records.

use chrono::{DateTime, Utc};
use native_db::*;
use native_model::{native_model, Model};
use scorebook_core::{
    Group, GroupId, GroupSettings, InviteCode, Player, PlayerId, PlayerStats, User, UserId,
};
use serde::{Deserialize, Serialize};

pub(crate) fn millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub(crate) fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

/// Stored user in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredUser {
    /// Primary key - user ID.
    #[primary_key]
    pub id: String,
    /// Display name.
    #[secondary_key]
    pub name: String,
    pub email: Option<String>,
    pub created_at_ms: i64,
}

impl StoredUser {
    /// Create from a domain User.
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.as_str().to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            created_at_ms: millis(user.created_at),
        }
    }

    /// Convert to a domain User.
    pub fn to_user(&self) -> User {
        User {
            id: UserId::new(self.id.clone()),
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: from_millis(self.created_at_ms),
        }
    }
}

/// Stored group in the database.
///
/// Member list and settings are serialized payloads; the indexed fields
/// are flattened out so secondary lookups stay cheap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredGroup {
    /// Primary key - group ID.
    #[primary_key]
    pub id: String,
    /// Invite code, unique across groups.
    #[secondary_key]
    pub invite_code: String,
    /// Creating user's ID.
    #[secondary_key]
    pub created_by: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at_ms: i64,
    /// Serialized member list.
    pub members: Vec<u8>,
    /// Serialized group settings.
    pub settings: Vec<u8>,
}

impl StoredGroup {
    /// Create from a domain Group.
    pub fn from_group(group: &Group) -> Self {
        let members = bincode::serialize(&group.members).unwrap_or_default();
        let settings = bincode::serialize(&group.settings).unwrap_or_default();
        Self {
            id: group.id.as_str().to_string(),
            invite_code: group.invite_code.as_str().to_string(),
            created_by: group.created_by.as_str().to_string(),
            name: group.name.clone(),
            description: group.description.clone(),
            created_at_ms: millis(group.created_at),
            members,
            settings,
        }
    }

    /// Convert to a domain Group.
    pub fn to_group(&self) -> Group {
        let members = bincode::deserialize(&self.members).unwrap_or_default();
        let settings: GroupSettings = bincode::deserialize(&self.settings).unwrap_or_default();
        Group {
            id: GroupId::new(self.id.clone()),
            name: self.name.clone(),
            description: self.description.clone(),
            created_by: UserId::new(self.created_by.clone()),
            created_at: from_millis(self.created_at_ms),
            members,
            invite_code: InviteCode::new(self.invite_code.clone()),
            settings,
        }
    }
}

/// Stored player in the database.
///
/// `group_ids` is multi-valued, so membership queries go through a primary
/// scan plus filter rather than a secondary key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 3, version = 1)]
#[native_db]
pub struct StoredPlayer {
    /// Primary key - player ID.
    #[primary_key]
    pub id: String,
    /// Display name.
    #[secondary_key]
    pub name: String,
    pub is_group_member: bool,
    pub group_ids: Vec<String>,
    pub is_active: bool,
    /// Serialized career statistics.
    pub stats: Vec<u8>,
}

impl StoredPlayer {
    /// Create from a domain Player.
    pub fn from_player(player: &Player) -> Self {
        let stats = bincode::serialize(&player.stats).unwrap_or_default();
        Self {
            id: player.id.as_str().to_string(),
            name: player.name.clone(),
            is_group_member: player.is_group_member,
            group_ids: player
                .group_ids
                .iter()
                .map(|g| g.as_str().to_string())
                .collect(),
            is_active: player.is_active,
            stats,
        }
    }

    /// Convert to a domain Player.
    pub fn to_player(&self) -> Player {
        let stats: PlayerStats = bincode::deserialize(&self.stats).unwrap_or_default();
        Player {
            id: PlayerId::new(self.id.clone()),
            name: self.name.clone(),
            is_group_member: self.is_group_member,
            group_ids: self.group_ids.iter().map(|g| GroupId::new(g.clone())).collect(),
            is_active: self.is_active,
            stats,
        }
    }
}
