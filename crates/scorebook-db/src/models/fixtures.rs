//! Stored models for match, invitation, and setting records.

use super::records::{from_millis, millis};
use native_db::*;
use native_model::{native_model, Model};
use scorebook_core::{
    GroupId, Invitation, InvitationId, InvitationStatus, Match, MatchId, MatchResult, MatchStatus,
    PlayerId, Setting, UserId,
};
use serde::{Deserialize, Serialize};

/// Stored match in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 4, version = 1)]
#[native_db]
pub struct StoredMatch {
    /// Primary key - match ID.
    #[primary_key]
    pub id: String,
    /// Owning group's ID.
    #[secondary_key]
    pub group_id: String,
    pub home_team: String,
    pub away_team: String,
    pub scheduled_at_ms: i64,
    /// Lifecycle status.
    pub status: u8,
    pub players: Vec<String>,
    /// Serialized result, if any.
    pub result: Vec<u8>,
}

impl StoredMatch {
    /// Create from a domain Match.
    pub fn from_match(m: &Match) -> Self {
        let status = match m.status {
            MatchStatus::Scheduled => 0,
            MatchStatus::InProgress => 1,
            MatchStatus::Completed => 2,
            MatchStatus::Abandoned => 3,
        };
        let result = bincode::serialize(&m.result).unwrap_or_default();
        Self {
            id: m.id.as_str().to_string(),
            group_id: m.group_id.as_str().to_string(),
            home_team: m.home_team.clone(),
            away_team: m.away_team.clone(),
            scheduled_at_ms: millis(m.scheduled_at),
            status,
            players: m.players.iter().map(|p| p.as_str().to_string()).collect(),
            result,
        }
    }

    /// Convert to a domain Match.
    pub fn to_match(&self) -> Match {
        let status = match self.status {
            0 => MatchStatus::Scheduled,
            1 => MatchStatus::InProgress,
            2 => MatchStatus::Completed,
            _ => MatchStatus::Abandoned,
        };
        let result: Option<MatchResult> = bincode::deserialize(&self.result).unwrap_or_default();
        Match {
            id: MatchId::new(self.id.clone()),
            group_id: GroupId::new(self.group_id.clone()),
            home_team: self.home_team.clone(),
            away_team: self.away_team.clone(),
            scheduled_at: from_millis(self.scheduled_at_ms),
            status,
            players: self.players.iter().map(|p| PlayerId::new(p.clone())).collect(),
            result,
        }
    }
}

/// Stored invitation in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 5, version = 1)]
#[native_db]
pub struct StoredInvitation {
    /// Primary key - invitation ID.
    #[primary_key]
    pub id: String,
    /// Group the invitation is for.
    #[secondary_key]
    pub group_id: String,
    pub created_by: String,
    pub invitee: Option<String>,
    /// Lifecycle status.
    pub status: u8,
    pub created_at_ms: i64,
    pub expires_at_ms: Option<i64>,
}

impl StoredInvitation {
    /// Create from a domain Invitation.
    pub fn from_invitation(inv: &Invitation) -> Self {
        let status = match inv.status {
            InvitationStatus::Pending => 0,
            InvitationStatus::Accepted => 1,
            InvitationStatus::Revoked => 2,
            InvitationStatus::Expired => 3,
        };
        Self {
            id: inv.id.as_str().to_string(),
            group_id: inv.group_id.as_str().to_string(),
            created_by: inv.created_by.as_str().to_string(),
            invitee: inv.invitee.as_ref().map(|u| u.as_str().to_string()),
            status,
            created_at_ms: millis(inv.created_at),
            expires_at_ms: inv.expires_at.map(millis),
        }
    }

    /// Convert to a domain Invitation.
    pub fn to_invitation(&self) -> Invitation {
        let status = match self.status {
            0 => InvitationStatus::Pending,
            1 => InvitationStatus::Accepted,
            2 => InvitationStatus::Revoked,
            _ => InvitationStatus::Expired,
        };
        Invitation {
            id: InvitationId::new(self.id.clone()),
            group_id: GroupId::new(self.group_id.clone()),
            created_by: UserId::new(self.created_by.clone()),
            invitee: self.invitee.as_ref().map(|u| UserId::new(u.clone())),
            status,
            created_at: from_millis(self.created_at_ms),
            expires_at: self.expires_at_ms.map(from_millis),
        }
    }
}

/// Stored application setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 6, version = 1)]
#[native_db]
pub struct StoredSetting {
    /// Primary key - setting key.
    #[primary_key]
    pub id: String,
    pub value: String,
    pub updated_at_ms: i64,
}

impl StoredSetting {
    /// Create from a domain Setting.
    pub fn from_setting(setting: &Setting) -> Self {
        Self {
            id: setting.id.clone(),
            value: setting.value.clone(),
            updated_at_ms: millis(setting.updated_at),
        }
    }

    /// Convert to a domain Setting.
    pub fn to_setting(&self) -> Setting {
        Setting {
            id: self.id.clone(),
            value: self.value.clone(),
            updated_at: from_millis(self.updated_at_ms),
        }
    }
}
