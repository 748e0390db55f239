//! Player record and career statistics

use crate::identity::{GroupId, PlayerId};
use serde::{Deserialize, Serialize};

/// Career counters maintained by the scoring layer
///
/// The calculator that fills these in lives outside this crate; here they
/// are plain persisted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlayerStats {
    pub matches: u32,
    pub innings: u32,
    pub runs: u32,
    pub balls_faced: u32,
    pub wickets: u32,
    pub catches: u32,
    pub highest_score: u32,
}

/// A player known to this device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Primary key, immutable once assigned
    pub id: PlayerId,
    pub name: String,
    /// Whether the player belongs to at least one group
    ///
    /// When true, `group_ids` must reference at least one existing group
    /// for the store to be integrity-clean. Violations are reported by the
    /// integrity checker, never auto-healed.
    pub is_group_member: bool,
    /// Groups the player belongs to (multi-valued)
    pub group_ids: Vec<GroupId>,
    pub is_active: bool,
    pub stats: PlayerStats,
}

impl Player {
    /// Create an active player with no group membership
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_group_member: false,
            group_ids: Vec::new(),
            is_active: true,
            stats: PlayerStats::default(),
        }
    }

    /// Create a player belonging to one group
    pub fn in_group(id: impl Into<PlayerId>, name: impl Into<String>, group: GroupId) -> Self {
        let mut player = Self::new(id, name);
        player.is_group_member = true;
        player.group_ids.push(group);
        player
    }

    /// Check membership in a specific group
    pub fn belongs_to(&self, group_id: &GroupId) -> bool {
        self.group_ids.iter().any(|g| g == group_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_membership() {
        let player = Player::in_group("p-1", "A. Batter", GroupId::new("g-1"));
        assert!(player.is_group_member);
        assert!(player.belongs_to(&GroupId::new("g-1")));
        assert!(!player.belongs_to(&GroupId::new("g-2")));
    }
}
