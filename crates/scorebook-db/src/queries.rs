//! Secondary-index queries and scan filters.
//!
//! Every secondary lookup falls back to a primary scan with an in-memory
//! filter when the index is structurally unavailable. Schema upgrades can
//! leave an installed store without a given index table, so the fallback
//! is required behavior, not an edge case.

use crate::error::{Error, Result};
use crate::models::*;
use crate::store::Store;
use chrono::Utc;
use scorebook_core::{Group, GroupId, Invitation, Match, Player, User, UserId};
use tracing::warn;

impl Store {
    /// Groups whose invite code equals `code` (at most one when the
    /// uniqueness invariant holds).
    pub fn groups_by_invite_code(&self, code: &str) -> Result<Vec<Group>> {
        match self.groups_by_invite_code_indexed(code) {
            Ok(groups) => Ok(groups),
            Err(e) => {
                warn!("invite-code index unavailable, using full scan: {e}");
                Ok(self
                    .load_all_groups()?
                    .into_iter()
                    .filter(|g| g.invite_code.as_str() == code)
                    .collect())
            }
        }
    }

    fn groups_by_invite_code_indexed(&self, code: &str) -> Result<Vec<Group>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredGroup>(StoredGroupKey::invite_code)?;
        let iter = scan.start_with(code)?;
        let rows: std::result::Result<Vec<StoredGroup>, _> = iter.collect();
        let rows = rows.map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows
            .into_iter()
            .filter(|g| g.invite_code == code)
            .map(|g| g.to_group())
            .collect())
    }

    /// Groups created by a specific user.
    pub fn groups_created_by(&self, user_id: &UserId) -> Result<Vec<Group>> {
        match self.groups_created_by_indexed(user_id) {
            Ok(groups) => Ok(groups),
            Err(e) => {
                warn!("creator index unavailable, using full scan: {e}");
                Ok(self
                    .load_all_groups()?
                    .into_iter()
                    .filter(|g| &g.created_by == user_id)
                    .collect())
            }
        }
    }

    fn groups_created_by_indexed(&self, user_id: &UserId) -> Result<Vec<Group>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredGroup>(StoredGroupKey::created_by)?;
        let iter = scan.start_with(user_id.as_str())?;
        let rows: std::result::Result<Vec<StoredGroup>, _> = iter.collect();
        let rows = rows.map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows
            .into_iter()
            .filter(|g| g.created_by == user_id.as_str())
            .map(|g| g.to_group())
            .collect())
    }

    /// Players with an exact display name.
    pub fn players_by_name(&self, name: &str) -> Result<Vec<Player>> {
        match self.players_by_name_indexed(name) {
            Ok(players) => Ok(players),
            Err(e) => {
                warn!("player-name index unavailable, using full scan: {e}");
                Ok(self
                    .load_all_players()?
                    .into_iter()
                    .filter(|p| p.name == name)
                    .collect())
            }
        }
    }

    fn players_by_name_indexed(&self, name: &str) -> Result<Vec<Player>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().secondary::<StoredPlayer>(StoredPlayerKey::name)?;
        let iter = scan.start_with(name)?;
        let rows: std::result::Result<Vec<StoredPlayer>, _> = iter.collect();
        let rows = rows.map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows
            .into_iter()
            .filter(|p| p.name == name)
            .map(|p| p.to_player())
            .collect())
    }

    /// Players belonging to a group.
    ///
    /// Membership is multi-valued, so this is a primary scan with a
    /// filter; a record matches if any of its group ids equals `group_id`.
    pub fn players_in_group(&self, group_id: &GroupId) -> Result<Vec<Player>> {
        Ok(self
            .load_all_players()?
            .into_iter()
            .filter(|p| p.belongs_to(group_id))
            .collect())
    }

    /// Players currently marked active.
    pub fn active_players(&self) -> Result<Vec<Player>> {
        Ok(self
            .load_all_players()?
            .into_iter()
            .filter(|p| p.is_active)
            .collect())
    }

    /// Matches belonging to a group.
    pub fn matches_in_group(&self, group_id: &GroupId) -> Result<Vec<Match>> {
        match self.matches_in_group_indexed(group_id) {
            Ok(matches) => Ok(matches),
            Err(e) => {
                warn!("match-group index unavailable, using full scan: {e}");
                Ok(self
                    .load_all_matches()?
                    .into_iter()
                    .filter(|m| &m.group_id == group_id)
                    .collect())
            }
        }
    }

    fn matches_in_group_indexed(&self, group_id: &GroupId) -> Result<Vec<Match>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().secondary::<StoredMatch>(StoredMatchKey::group_id)?;
        let iter = scan.start_with(group_id.as_str())?;
        let rows: std::result::Result<Vec<StoredMatch>, _> = iter.collect();
        let rows = rows.map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows
            .into_iter()
            .filter(|m| m.group_id == group_id.as_str())
            .map(|m| m.to_match())
            .collect())
    }

    /// Matches still open, or scheduled within the last `days` days.
    pub fn open_or_recent_matches(&self, days: i64) -> Result<Vec<Match>> {
        let now = Utc::now();
        Ok(self
            .load_all_matches()?
            .into_iter()
            .filter(|m| m.is_open() || m.is_newer_than(days, now))
            .collect())
    }

    /// Invitations issued for a group.
    pub fn invitations_for_group(&self, group_id: &GroupId) -> Result<Vec<Invitation>> {
        match self.invitations_for_group_indexed(group_id) {
            Ok(invitations) => Ok(invitations),
            Err(e) => {
                warn!("invitation-group index unavailable, using full scan: {e}");
                Ok(self
                    .load_all_invitations()?
                    .into_iter()
                    .filter(|i| &i.group_id == group_id)
                    .collect())
            }
        }
    }

    fn invitations_for_group_indexed(&self, group_id: &GroupId) -> Result<Vec<Invitation>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredInvitation>(StoredInvitationKey::group_id)?;
        let iter = scan.start_with(group_id.as_str())?;
        let rows: std::result::Result<Vec<StoredInvitation>, _> = iter.collect();
        let rows = rows.map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows
            .into_iter()
            .filter(|i| i.group_id == group_id.as_str())
            .map(|i| i.to_invitation())
            .collect())
    }

    /// The `limit` most recently created users, newest first.
    pub fn recent_users(&self, limit: usize) -> Result<Vec<User>> {
        let mut users = self.load_all_users()?;
        users.sort_by_key(|u| std::cmp::Reverse(u.created_at));
        users.truncate(limit);
        Ok(users)
    }

    /// The `limit` most recently created groups, newest first.
    pub fn recent_groups(&self, limit: usize) -> Result<Vec<Group>> {
        let mut groups = self.load_all_groups()?;
        groups.sort_by_key(|g| std::cmp::Reverse(g.created_at));
        groups.truncate(limit);
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use scorebook_core::{InviteCode, MatchStatus, User};

    fn group(id: &str, code: &str) -> Group {
        Group::new(id, "Test CC", UserId::new("u-1"), InviteCode::new(code))
    }

    #[test]
    fn test_groups_by_invite_code() {
        let store = Store::in_memory().unwrap();
        store.save_group(&group("g-1", "AB12CD")).unwrap();
        store.save_group(&group("g-2", "ZZ99XX")).unwrap();

        let hits = store.groups_by_invite_code("AB12CD").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "g-1");
        assert!(store.groups_by_invite_code("NOPE00").unwrap().is_empty());
    }

    #[test]
    fn test_prefix_of_a_code_does_not_match() {
        let store = Store::in_memory().unwrap();
        store.save_group(&group("g-1", "AB12CD")).unwrap();
        assert!(store.groups_by_invite_code("AB12C").unwrap().is_empty());
    }

    #[test]
    fn test_index_never_returns_deleted_records() {
        let store = Store::in_memory().unwrap();
        let g = group("g-1", "AB12CD");
        store.save_group(&g).unwrap();
        store.delete_group(&g.id).unwrap();
        assert!(store.groups_by_invite_code("AB12CD").unwrap().is_empty());
    }

    #[test]
    fn test_players_in_group_multi_valued() {
        let store = Store::in_memory().unwrap();
        let g1 = GroupId::new("g-1");
        let g2 = GroupId::new("g-2");

        let mut both = Player::in_group("p-1", "A", g1.clone());
        both.group_ids.push(g2.clone());
        store.save_player(&both).unwrap();
        store
            .save_player(&Player::in_group("p-2", "B", g2.clone()))
            .unwrap();
        store.save_player(&Player::new("p-3", "C")).unwrap();

        let in_g1 = store.players_in_group(&g1).unwrap();
        assert_eq!(in_g1.len(), 1);
        let in_g2 = store.players_in_group(&g2).unwrap();
        assert_eq!(in_g2.len(), 2);
    }

    #[test]
    fn test_matches_in_group_and_window() {
        let store = Store::in_memory().unwrap();
        let g = GroupId::new("g-1");
        let now = Utc::now();

        let recent = Match::new("m-1", g.clone(), "Home", "Away", now - Duration::days(3));
        let mut old_done = Match::new("m-2", g.clone(), "Home", "Away", now - Duration::days(60));
        old_done.status = MatchStatus::Completed;
        let mut old_open = Match::new("m-3", g.clone(), "Home", "Away", now - Duration::days(60));
        old_open.status = MatchStatus::InProgress;
        store
            .save_matches(&[recent.clone(), old_done, old_open.clone()])
            .unwrap();

        assert_eq!(store.matches_in_group(&g).unwrap().len(), 3);

        let windowed = store.open_or_recent_matches(30).unwrap();
        let ids: Vec<&str> = windowed.iter().map(|m| m.id.as_str()).collect();
        assert!(ids.contains(&"m-1"));
        assert!(ids.contains(&"m-3"));
        assert!(!ids.contains(&"m-2"));
    }

    #[test]
    fn test_recent_users_ordering() {
        let store = Store::in_memory().unwrap();
        let mut early = User::new("u-1", "Early");
        early.created_at = Utc::now() - Duration::days(10);
        let late = User::new("u-2", "Late");
        store.save_users(&[early, late]).unwrap();

        let recent = store.recent_users(1).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id.as_str(), "u-2");
    }
}
