//! Snapshot payload and tier policy.
//!
//! A snapshot is built in descending tiers; the engine picks the first
//! tier whose serialized form fits the byte budget. Tiers are data - an
//! ordered rule table - so adding or reordering one never duplicates the
//! sizing loop.
//!
//! Invitations are short-lived and are not carried in snapshots; they are
//! cleared on restore and reissued as needed.

use crate::error::Result;
use scorebook_core::{Group, Match, Player, Setting, User};
use scorebook_db::Store;
use serde::{Deserialize, Serialize};

/// Days of match history carried by the windowed tier.
pub const MATCH_WINDOW_DAYS: i64 = 30;

/// Collection caps for the windowed tier.
pub const WINDOW_USER_CAP: usize = 20;
pub const WINDOW_GROUP_CAP: usize = 10;
pub const WINDOW_MATCH_CAP: usize = 50;
pub const WINDOW_PLAYER_CAP: usize = 100;

/// Collection caps for the minimal tier.
pub const MINIMAL_USER_CAP: usize = 5;
pub const MINIMAL_GROUP_CAP: usize = 5;

/// Collections carried by a snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapshotData {
    pub users: Vec<User>,
    pub groups: Vec<Group>,
    pub players: Vec<Player>,
    pub matches: Vec<Match>,
    pub settings: Vec<Setting>,
}

/// The serialized snapshot payload, JSON at both slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFile {
    pub timestamp_epoch_millis: i64,
    pub schema_version: u32,
    pub data: SnapshotData,
}

/// One sizing tier: a name and a builder for its data subset.
pub(crate) struct TierRule {
    pub name: &'static str,
    pub build: fn(&Store) -> Result<SnapshotData>,
}

/// Tiers in descending order of completeness.
pub(crate) const TIERS: &[TierRule] = &[
    TierRule {
        name: "full",
        build: build_full,
    },
    TierRule {
        name: "windowed",
        build: build_windowed,
    },
    TierRule {
        name: "minimal",
        build: build_minimal,
    },
];

/// Full copy of every snapshot collection.
fn build_full(store: &Store) -> Result<SnapshotData> {
    Ok(SnapshotData {
        users: store.load_all_users()?,
        groups: store.load_all_groups()?,
        players: store.load_all_players()?,
        matches: store.load_all_matches()?,
        settings: store.load_all_settings()?,
    })
}

/// Most recent users and groups, open or recent matches, active players.
fn build_windowed(store: &Store) -> Result<SnapshotData> {
    let mut matches = store.open_or_recent_matches(MATCH_WINDOW_DAYS)?;
    matches.truncate(WINDOW_MATCH_CAP);
    let mut players = store.active_players()?;
    players.truncate(WINDOW_PLAYER_CAP);
    Ok(SnapshotData {
        users: store.recent_users(WINDOW_USER_CAP)?,
        groups: store.recent_groups(WINDOW_GROUP_CAP)?,
        players,
        matches,
        settings: store.load_all_settings()?,
    })
}

/// A handful of the most recent users and groups, everything else empty.
fn build_minimal(store: &Store) -> Result<SnapshotData> {
    Ok(SnapshotData {
        users: store.recent_users(MINIMAL_USER_CAP)?,
        groups: store.recent_groups(MINIMAL_GROUP_CAP)?,
        ..SnapshotData::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorebook_core::{GroupId, InviteCode, UserId};

    fn seeded_store() -> Store {
        let store = Store::in_memory().unwrap();
        for i in 0..8 {
            store
                .save_user(&User::new(format!("u-{i}"), format!("User {i}")))
                .unwrap();
        }
        store
            .save_group(&Group::new(
                "g-1",
                "Test CC",
                UserId::new("u-0"),
                InviteCode::new("AB12CD"),
            ))
            .unwrap();
        let mut inactive = Player::new("p-1", "Benched");
        inactive.is_active = false;
        store.save_player(&inactive).unwrap();
        store
            .save_player(&Player::in_group("p-2", "Opener", GroupId::new("g-1")))
            .unwrap();
        store
    }

    #[test]
    fn test_tier_order() {
        let names: Vec<&str> = TIERS.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["full", "windowed", "minimal"]);
    }

    #[test]
    fn test_windowed_keeps_active_players_only() {
        let store = seeded_store();
        let data = build_windowed(&store).unwrap();
        assert_eq!(data.players.len(), 1);
        assert_eq!(data.players[0].id.as_str(), "p-2");
    }

    #[test]
    fn test_minimal_caps_and_empties() {
        let store = seeded_store();
        let data = build_minimal(&store).unwrap();
        assert_eq!(data.users.len(), MINIMAL_USER_CAP);
        assert_eq!(data.groups.len(), 1);
        assert!(data.players.is_empty());
        assert!(data.matches.is_empty());
        assert!(data.settings.is_empty());
    }

    #[test]
    fn test_snapshot_file_camel_case_keys() {
        let file = SnapshotFile {
            timestamp_epoch_millis: 1_700_000_000_000,
            schema_version: 3,
            data: SnapshotData::default(),
        };
        let json = serde_json::to_string(&file).unwrap();
        assert!(json.contains("\"timestampEpochMillis\""));
        assert!(json.contains("\"schemaVersion\""));
        assert!(json.contains("\"matches\""));
    }
}
