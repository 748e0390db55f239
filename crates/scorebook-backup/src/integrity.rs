//! Referential integrity checker.
//!
//! A read-only pass over all collections. The store never enforces
//! foreign keys, so dangling references are possible by design; this
//! checker surfaces them as data for the caller to act on. Nothing is
//! mutated and violations are never errors.

use crate::error::Result;
use indexmap::IndexMap;
use scorebook_core::{GroupId, InvitationId, MatchId, PlayerId, UserId};
use scorebook_db::Store;
use std::collections::HashSet;
use std::fmt;

/// One referential violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// A player references a group that no longer exists.
    PlayerGroupMissing {
        player_id: PlayerId,
        group_id: GroupId,
    },
    /// A player is flagged as a group member but no referenced group exists.
    PlayerMemberWithoutGroup { player_id: PlayerId },
    /// A group's creator no longer exists.
    GroupCreatorMissing { group_id: GroupId, user_id: UserId },
    /// A match references a group that no longer exists.
    MatchGroupMissing {
        match_id: MatchId,
        group_id: GroupId,
    },
    /// An invitation references a group that no longer exists.
    InvitationGroupMissing {
        invitation_id: InvitationId,
        group_id: GroupId,
    },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::PlayerGroupMissing {
                player_id,
                group_id,
            } => write!(f, "player {player_id} references missing group {group_id}"),
            IntegrityIssue::PlayerMemberWithoutGroup { player_id } => {
                write!(f, "player {player_id} is marked a member but has no live group")
            }
            IntegrityIssue::GroupCreatorMissing { group_id, user_id } => {
                write!(f, "group {group_id} references missing creator {user_id}")
            }
            IntegrityIssue::MatchGroupMissing { match_id, group_id } => {
                write!(f, "match {match_id} references missing group {group_id}")
            }
            IntegrityIssue::InvitationGroupMissing {
                invitation_id,
                group_id,
            } => write!(
                f,
                "invitation {invitation_id} references missing group {group_id}"
            ),
        }
    }
}

/// Scan counters for the report.
#[derive(Debug, Clone, Default)]
pub struct IntegrityStats {
    /// Records scanned per collection, in scan order.
    pub scanned: IndexMap<&'static str, usize>,
    /// Number of issues found.
    pub issue_count: usize,
}

/// Outcome of an integrity pass.
#[derive(Debug, Clone)]
pub struct IntegrityReport {
    pub healthy: bool,
    pub issues: Vec<IntegrityIssue>,
    pub stats: IntegrityStats,
}

impl fmt::Display for IntegrityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Integrity Report ===")?;
        writeln!(f, "Healthy: {}", self.healthy)?;
        for (collection, count) in &self.stats.scanned {
            writeln!(f, "  {collection}: {count} scanned")?;
        }
        if !self.issues.is_empty() {
            writeln!(f, "\nIssues:")?;
            for issue in &self.issues {
                writeln!(f, "  {issue}")?;
            }
        }
        Ok(())
    }
}

/// Run a read-only integrity pass over the store.
pub fn check_integrity(store: &Store) -> Result<IntegrityReport> {
    let users = store.load_all_users()?;
    let groups = store.load_all_groups()?;
    let players = store.load_all_players()?;
    let matches = store.load_all_matches()?;
    let invitations = store.load_all_invitations()?;

    let user_ids: HashSet<&str> = users.iter().map(|u| u.id.as_str()).collect();
    let group_ids: HashSet<&str> = groups.iter().map(|g| g.id.as_str()).collect();

    let mut issues = Vec::new();

    for player in &players {
        let mut live_groups = 0;
        for group_id in &player.group_ids {
            if group_ids.contains(group_id.as_str()) {
                live_groups += 1;
            } else {
                issues.push(IntegrityIssue::PlayerGroupMissing {
                    player_id: player.id.clone(),
                    group_id: group_id.clone(),
                });
            }
        }
        if player.is_group_member && live_groups == 0 {
            issues.push(IntegrityIssue::PlayerMemberWithoutGroup {
                player_id: player.id.clone(),
            });
        }
    }

    for group in &groups {
        if !user_ids.contains(group.created_by.as_str()) {
            issues.push(IntegrityIssue::GroupCreatorMissing {
                group_id: group.id.clone(),
                user_id: group.created_by.clone(),
            });
        }
    }

    for m in &matches {
        if !group_ids.contains(m.group_id.as_str()) {
            issues.push(IntegrityIssue::MatchGroupMissing {
                match_id: m.id.clone(),
                group_id: m.group_id.clone(),
            });
        }
    }

    for invitation in &invitations {
        if !group_ids.contains(invitation.group_id.as_str()) {
            issues.push(IntegrityIssue::InvitationGroupMissing {
                invitation_id: invitation.id.clone(),
                group_id: invitation.group_id.clone(),
            });
        }
    }

    let mut scanned = IndexMap::new();
    scanned.insert("users", users.len());
    scanned.insert("groups", groups.len());
    scanned.insert("players", players.len());
    scanned.insert("matches", matches.len());
    scanned.insert("invitations", invitations.len());

    Ok(IntegrityReport {
        healthy: issues.is_empty(),
        stats: IntegrityStats {
            scanned,
            issue_count: issues.len(),
        },
        issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use scorebook_core::{Group, InviteCode, Match, Player, User};

    #[test]
    fn test_clean_store_is_healthy() {
        let store = Store::in_memory().unwrap();
        let user = User::new("u-1", "Sam");
        store.save_user(&user).unwrap();
        let group = Group::new("g-1", "Test CC", user.id.clone(), InviteCode::new("AB12CD"));
        store.save_group(&group).unwrap();
        store
            .save_player(&Player::in_group("p-1", "Opener", group.id.clone()))
            .unwrap();

        let report = check_integrity(&store).unwrap();
        assert!(report.healthy);
        assert!(report.issues.is_empty());
        assert_eq!(report.stats.scanned["players"], 1);
    }

    #[test]
    fn test_dangling_references_are_reported_not_healed() {
        let store = Store::in_memory().unwrap();
        // Group whose creator was never stored
        let group = Group::new("g-1", "Test CC", UserId::new("u-gone"), InviteCode::new("AB12CD"));
        store.save_group(&group).unwrap();
        // Player pointing at a group that does not exist
        let player = Player::in_group("p-1", "Opener", GroupId::new("g-gone"));
        store.save_player(&player).unwrap();
        // Match pointing at a group that does not exist
        store
            .save_match(&Match::new(
                "m-1",
                GroupId::new("g-gone"),
                "Home",
                "Away",
                Utc::now(),
            ))
            .unwrap();

        let report = check_integrity(&store).unwrap();
        assert!(!report.healthy);
        assert_eq!(report.stats.issue_count, 4);
        assert!(report.issues.contains(&IntegrityIssue::GroupCreatorMissing {
            group_id: group.id.clone(),
            user_id: UserId::new("u-gone"),
        }));
        assert!(report
            .issues
            .contains(&IntegrityIssue::PlayerMemberWithoutGroup {
                player_id: player.id.clone(),
            }));

        // The checker mutated nothing
        assert!(store.load_player(&player.id).unwrap().is_some());
        assert!(store.load_group(&group.id).unwrap().is_some());
    }

    #[test]
    fn test_member_flag_with_one_live_group_is_clean() {
        let store = Store::in_memory().unwrap();
        let user = User::new("u-1", "Sam");
        store.save_user(&user).unwrap();
        let group = Group::new("g-1", "Test CC", user.id.clone(), InviteCode::new("AB12CD"));
        store.save_group(&group).unwrap();

        // One live reference and one dangling one
        let mut player = Player::in_group("p-1", "Opener", group.id.clone());
        player.group_ids.push(GroupId::new("g-gone"));
        store.save_player(&player).unwrap();

        let report = check_integrity(&store).unwrap();
        assert_eq!(report.issues.len(), 1);
        assert!(matches!(
            report.issues[0],
            IntegrityIssue::PlayerGroupMissing { .. }
        ));
    }
}
