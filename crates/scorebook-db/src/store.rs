//! Record store wrapper.
//!
//! The `Store` exclusively owns the underlying database handle; the backup
//! engine and invitation protocol reach storage only through this API.
//! Every save/delete is a single storage-engine transaction, so no partial
//! index update is ever observable. Concurrent writers from independent
//! handles are whole-record last-write-wins; there is no field-level merge.

use crate::error::{Error, Result};
use crate::migration;
use crate::models::*;
use crate::replicate::{ReplicateOp, Replicator};
use native_db::*;
use scorebook_core::{
    Group, GroupId, Invitation, InvitationId, Match, MatchId, Player, PlayerId, Record, Setting,
    User, UserId,
};
use std::path::Path;
use std::sync::{Arc, LazyLock};

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredUser>().unwrap();
    models.define::<StoredGroup>().unwrap();
    models.define::<StoredPlayer>().unwrap();
    models.define::<StoredMatch>().unwrap();
    models.define::<StoredInvitation>().unwrap();
    models.define::<StoredSetting>().unwrap();
    models.define::<StoredSchemaMeta>().unwrap();
    models
});

/// Record store over all collections.
pub struct Store {
    pub(crate) db: Database<'static>,
    replicator: Option<Arc<dyn Replicator>>,
}

impl Store {
    /// Open or create a store at the given path and migrate it to the
    /// current schema version.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(&MODELS, path.as_ref())
            .map_err(|e| Error::Unavailable(e.to_string()))?;
        migration::run(&db)?;
        Ok(Self {
            db,
            replicator: None,
        })
    }

    /// Create an in-memory store.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Unavailable(e.to_string()))?;
        migration::run(&db)?;
        Ok(Self {
            db,
            replicator: None,
        })
    }

    /// Attach a cloud replicator, notified after each committed mutation.
    pub fn with_replicator(mut self, replicator: Arc<dyn Replicator>) -> Self {
        self.replicator = Some(replicator);
        self
    }

    /// Schema version the store is currently migrated to.
    pub fn schema_version(&self) -> Result<u32> {
        migration::current_version(&self.db)
    }

    fn ensure_id(id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(Error::InvalidRecord("empty id".to_string()));
        }
        Ok(())
    }

    fn notify(&self, op: ReplicateOp, record: Record) {
        if let Some(replicator) = &self.replicator {
            replicator.replicate(op, &record);
        }
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Insert or replace a user.
    pub fn save_user(&self, user: &User) -> Result<()> {
        Self::ensure_id(user.id.as_str())?;
        let rw = self.db.rw_transaction()?;
        rw.upsert(StoredUser::from_user(user))?;
        rw.commit()?;
        self.notify(ReplicateOp::Put, Record::User(user.clone()));
        Ok(())
    }

    /// Insert or replace a batch of users in one transaction.
    pub fn save_users(&self, users: &[User]) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        for user in users {
            Self::ensure_id(user.id.as_str())?;
            rw.upsert(StoredUser::from_user(user))?;
        }
        rw.commit()?;
        for user in users {
            self.notify(ReplicateOp::Put, Record::User(user.clone()));
        }
        Ok(())
    }

    /// Load a user by ID.
    pub fn load_user(&self, id: &UserId) -> Result<Option<User>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredUser> = r.get().primary(id.as_str().to_string())?;
        Ok(stored.map(|s| s.to_user()))
    }

    /// Load all users.
    pub fn load_all_users(&self) -> Result<Vec<User>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredUser>()?;
        let iter = scan.all()?;
        let rows: std::result::Result<Vec<StoredUser>, _> = iter.collect();
        let rows = rows.map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|s| s.to_user()).collect())
    }

    /// Delete a user. Does not cascade to groups or players.
    pub fn delete_user(&self, id: &UserId) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        let stored: Option<StoredUser> = rw.get().primary(id.as_str().to_string())?;
        let removed = match stored {
            Some(s) => {
                let user = s.to_user();
                rw.remove(s)?;
                Some(user)
            }
            None => None,
        };
        rw.commit()?;
        if let Some(user) = removed {
            self.notify(ReplicateOp::Delete, Record::User(user));
        }
        Ok(())
    }

    // ========================================================================
    // Groups
    // ========================================================================

    /// Insert or replace a group.
    pub fn save_group(&self, group: &Group) -> Result<()> {
        Self::ensure_id(group.id.as_str())?;
        let rw = self.db.rw_transaction()?;
        rw.upsert(StoredGroup::from_group(group))?;
        rw.commit()?;
        self.notify(ReplicateOp::Put, Record::Group(group.clone()));
        Ok(())
    }

    /// Insert or replace a batch of groups in one transaction.
    pub fn save_groups(&self, groups: &[Group]) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        for group in groups {
            Self::ensure_id(group.id.as_str())?;
            rw.upsert(StoredGroup::from_group(group))?;
        }
        rw.commit()?;
        for group in groups {
            self.notify(ReplicateOp::Put, Record::Group(group.clone()));
        }
        Ok(())
    }

    /// Load a group by ID.
    pub fn load_group(&self, id: &GroupId) -> Result<Option<Group>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredGroup> = r.get().primary(id.as_str().to_string())?;
        Ok(stored.map(|s| s.to_group()))
    }

    /// Load all groups.
    pub fn load_all_groups(&self) -> Result<Vec<Group>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredGroup>()?;
        let iter = scan.all()?;
        let rows: std::result::Result<Vec<StoredGroup>, _> = iter.collect();
        let rows = rows.map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|s| s.to_group()).collect())
    }

    /// Delete a group.
    ///
    /// Dependent players, matches, and invitations are NOT removed; that
    /// cleanup is the caller's responsibility.
    pub fn delete_group(&self, id: &GroupId) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        let stored: Option<StoredGroup> = rw.get().primary(id.as_str().to_string())?;
        let removed = match stored {
            Some(s) => {
                let group = s.to_group();
                rw.remove(s)?;
                Some(group)
            }
            None => None,
        };
        rw.commit()?;
        if let Some(group) = removed {
            self.notify(ReplicateOp::Delete, Record::Group(group));
        }
        Ok(())
    }

    // ========================================================================
    // Players
    // ========================================================================

    /// Insert or replace a player.
    pub fn save_player(&self, player: &Player) -> Result<()> {
        Self::ensure_id(player.id.as_str())?;
        let rw = self.db.rw_transaction()?;
        rw.upsert(StoredPlayer::from_player(player))?;
        rw.commit()?;
        self.notify(ReplicateOp::Put, Record::Player(player.clone()));
        Ok(())
    }

    /// Insert or replace a batch of players in one transaction.
    pub fn save_players(&self, players: &[Player]) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        for player in players {
            Self::ensure_id(player.id.as_str())?;
            rw.upsert(StoredPlayer::from_player(player))?;
        }
        rw.commit()?;
        for player in players {
            self.notify(ReplicateOp::Put, Record::Player(player.clone()));
        }
        Ok(())
    }

    /// Load a player by ID.
    pub fn load_player(&self, id: &PlayerId) -> Result<Option<Player>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredPlayer> = r.get().primary(id.as_str().to_string())?;
        Ok(stored.map(|s| s.to_player()))
    }

    /// Load all players.
    pub fn load_all_players(&self) -> Result<Vec<Player>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredPlayer>()?;
        let iter = scan.all()?;
        let rows: std::result::Result<Vec<StoredPlayer>, _> = iter.collect();
        let rows = rows.map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|s| s.to_player()).collect())
    }

    /// Delete a player.
    pub fn delete_player(&self, id: &PlayerId) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        let stored: Option<StoredPlayer> = rw.get().primary(id.as_str().to_string())?;
        let removed = match stored {
            Some(s) => {
                let player = s.to_player();
                rw.remove(s)?;
                Some(player)
            }
            None => None,
        };
        rw.commit()?;
        if let Some(player) = removed {
            self.notify(ReplicateOp::Delete, Record::Player(player));
        }
        Ok(())
    }

    // ========================================================================
    // Matches
    // ========================================================================

    /// Insert or replace a match.
    pub fn save_match(&self, m: &Match) -> Result<()> {
        Self::ensure_id(m.id.as_str())?;
        let rw = self.db.rw_transaction()?;
        rw.upsert(StoredMatch::from_match(m))?;
        rw.commit()?;
        self.notify(ReplicateOp::Put, Record::Match(m.clone()));
        Ok(())
    }

    /// Insert or replace a batch of matches in one transaction.
    pub fn save_matches(&self, matches: &[Match]) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        for m in matches {
            Self::ensure_id(m.id.as_str())?;
            rw.upsert(StoredMatch::from_match(m))?;
        }
        rw.commit()?;
        for m in matches {
            self.notify(ReplicateOp::Put, Record::Match(m.clone()));
        }
        Ok(())
    }

    /// Load a match by ID.
    pub fn load_match(&self, id: &MatchId) -> Result<Option<Match>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredMatch> = r.get().primary(id.as_str().to_string())?;
        Ok(stored.map(|s| s.to_match()))
    }

    /// Load all matches.
    pub fn load_all_matches(&self) -> Result<Vec<Match>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredMatch>()?;
        let iter = scan.all()?;
        let rows: std::result::Result<Vec<StoredMatch>, _> = iter.collect();
        let rows = rows.map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|s| s.to_match()).collect())
    }

    /// Delete a match.
    pub fn delete_match(&self, id: &MatchId) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        let stored: Option<StoredMatch> = rw.get().primary(id.as_str().to_string())?;
        let removed = match stored {
            Some(s) => {
                let m = s.to_match();
                rw.remove(s)?;
                Some(m)
            }
            None => None,
        };
        rw.commit()?;
        if let Some(m) = removed {
            self.notify(ReplicateOp::Delete, Record::Match(m));
        }
        Ok(())
    }

    // ========================================================================
    // Invitations
    // ========================================================================

    /// Insert or replace an invitation.
    pub fn save_invitation(&self, inv: &Invitation) -> Result<()> {
        Self::ensure_id(inv.id.as_str())?;
        let rw = self.db.rw_transaction()?;
        rw.upsert(StoredInvitation::from_invitation(inv))?;
        rw.commit()?;
        self.notify(ReplicateOp::Put, Record::Invitation(inv.clone()));
        Ok(())
    }

    /// Insert or replace a batch of invitations in one transaction.
    pub fn save_invitations(&self, invitations: &[Invitation]) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        for inv in invitations {
            Self::ensure_id(inv.id.as_str())?;
            rw.upsert(StoredInvitation::from_invitation(inv))?;
        }
        rw.commit()?;
        for inv in invitations {
            self.notify(ReplicateOp::Put, Record::Invitation(inv.clone()));
        }
        Ok(())
    }

    /// Load an invitation by ID.
    pub fn load_invitation(&self, id: &InvitationId) -> Result<Option<Invitation>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredInvitation> = r.get().primary(id.as_str().to_string())?;
        Ok(stored.map(|s| s.to_invitation()))
    }

    /// Load all invitations.
    pub fn load_all_invitations(&self) -> Result<Vec<Invitation>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredInvitation>()?;
        let iter = scan.all()?;
        let rows: std::result::Result<Vec<StoredInvitation>, _> = iter.collect();
        let rows = rows.map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|s| s.to_invitation()).collect())
    }

    /// Delete an invitation.
    pub fn delete_invitation(&self, id: &InvitationId) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        let stored: Option<StoredInvitation> = rw.get().primary(id.as_str().to_string())?;
        let removed = match stored {
            Some(s) => {
                let inv = s.to_invitation();
                rw.remove(s)?;
                Some(inv)
            }
            None => None,
        };
        rw.commit()?;
        if let Some(inv) = removed {
            self.notify(ReplicateOp::Delete, Record::Invitation(inv));
        }
        Ok(())
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Insert or replace a setting.
    pub fn save_setting(&self, setting: &Setting) -> Result<()> {
        Self::ensure_id(&setting.id)?;
        let rw = self.db.rw_transaction()?;
        rw.upsert(StoredSetting::from_setting(setting))?;
        rw.commit()?;
        self.notify(ReplicateOp::Put, Record::Setting(setting.clone()));
        Ok(())
    }

    /// Insert or replace a batch of settings in one transaction.
    pub fn save_settings(&self, settings: &[Setting]) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        for setting in settings {
            Self::ensure_id(&setting.id)?;
            rw.upsert(StoredSetting::from_setting(setting))?;
        }
        rw.commit()?;
        for setting in settings {
            self.notify(ReplicateOp::Put, Record::Setting(setting.clone()));
        }
        Ok(())
    }

    /// Load a setting by key.
    pub fn load_setting(&self, id: &str) -> Result<Option<Setting>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredSetting> = r.get().primary(id.to_string())?;
        Ok(stored.map(|s| s.to_setting()))
    }

    /// Load all settings.
    pub fn load_all_settings(&self) -> Result<Vec<Setting>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredSetting>()?;
        let iter = scan.all()?;
        let rows: std::result::Result<Vec<StoredSetting>, _> = iter.collect();
        let rows = rows.map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|s| s.to_setting()).collect())
    }

    /// Delete a setting.
    pub fn delete_setting(&self, id: &str) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        let stored: Option<StoredSetting> = rw.get().primary(id.to_string())?;
        let removed = match stored {
            Some(s) => {
                let setting = s.to_setting();
                rw.remove(s)?;
                Some(setting)
            }
            None => None,
        };
        rw.commit()?;
        if let Some(setting) = removed {
            self.notify(ReplicateOp::Delete, Record::Setting(setting));
        }
        Ok(())
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Clear every record collection. The schema version row is kept.
    pub fn clear_all(&self) -> Result<()> {
        // Collect current ids first, then remove in a single transaction
        let user_ids = self.collect_ids_users()?;
        let group_ids = self.collect_ids_groups()?;
        let player_ids = self.collect_ids_players()?;
        let match_ids = self.collect_ids_matches()?;
        let invitation_ids = self.collect_ids_invitations()?;
        let setting_ids = self.collect_ids_settings()?;

        let rw = self.db.rw_transaction()?;
        for id in user_ids {
            if let Some(row) = rw.get().primary::<StoredUser>(id)? {
                rw.remove(row)?;
            }
        }
        for id in group_ids {
            if let Some(row) = rw.get().primary::<StoredGroup>(id)? {
                rw.remove(row)?;
            }
        }
        for id in player_ids {
            if let Some(row) = rw.get().primary::<StoredPlayer>(id)? {
                rw.remove(row)?;
            }
        }
        for id in match_ids {
            if let Some(row) = rw.get().primary::<StoredMatch>(id)? {
                rw.remove(row)?;
            }
        }
        for id in invitation_ids {
            if let Some(row) = rw.get().primary::<StoredInvitation>(id)? {
                rw.remove(row)?;
            }
        }
        for id in setting_ids {
            if let Some(row) = rw.get().primary::<StoredSetting>(id)? {
                rw.remove(row)?;
            }
        }
        rw.commit()?;
        Ok(())
    }

    fn collect_ids_users(&self) -> Result<Vec<String>> {
        Ok(self.load_all_users()?.into_iter().map(|u| u.id.0).collect())
    }

    fn collect_ids_groups(&self) -> Result<Vec<String>> {
        Ok(self.load_all_groups()?.into_iter().map(|g| g.id.0).collect())
    }

    fn collect_ids_players(&self) -> Result<Vec<String>> {
        Ok(self
            .load_all_players()?
            .into_iter()
            .map(|p| p.id.0)
            .collect())
    }

    fn collect_ids_matches(&self) -> Result<Vec<String>> {
        Ok(self
            .load_all_matches()?
            .into_iter()
            .map(|m| m.id.0)
            .collect())
    }

    fn collect_ids_invitations(&self) -> Result<Vec<String>> {
        Ok(self
            .load_all_invitations()?
            .into_iter()
            .map(|i| i.id.0)
            .collect())
    }

    fn collect_ids_settings(&self) -> Result<Vec<String>> {
        Ok(self
            .load_all_settings()?
            .into_iter()
            .map(|s| s.id)
            .collect())
    }
}

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorebook_core::InviteCode;

    fn group(id: &str, code: &str) -> Group {
        Group::new(id, "Test CC", UserId::new("u-1"), InviteCode::new(code))
    }

    #[test]
    fn test_put_get_round_trip() {
        let store = Store::in_memory().unwrap();

        let user = User::new("u-1", "Sam");
        store.save_user(&user).unwrap();
        assert_eq!(store.load_user(&user.id).unwrap(), Some(user.clone()));

        let g = group("g-1", "AB12CD");
        store.save_group(&g).unwrap();
        assert_eq!(store.load_group(&g.id).unwrap(), Some(g.clone()));

        let player = Player::in_group("p-1", "A. Batter", g.id.clone());
        store.save_player(&player).unwrap();
        assert_eq!(store.load_player(&player.id).unwrap(), Some(player));
    }

    #[test]
    fn test_point_lookup_miss_is_none() {
        let store = Store::in_memory().unwrap();
        assert_eq!(store.load_user(&UserId::new("missing")).unwrap(), None);
    }

    #[test]
    fn test_batch_aborts_as_a_whole() {
        let store = Store::in_memory().unwrap();

        let bad = User::new("", "No Id");
        let batch = vec![User::new("u-1", "Sam"), bad, User::new("u-2", "Alex")];

        assert!(store.save_users(&batch).is_err());
        // Nothing from the batch is visible, including the valid rows
        assert_eq!(store.load_all_users().unwrap().len(), 0);
    }

    #[test]
    fn test_replace_by_id() {
        let store = Store::in_memory().unwrap();
        let mut user = User::new("u-1", "Sam");
        store.save_user(&user).unwrap();

        user.name = "Samantha".to_string();
        store.save_user(&user).unwrap();

        let loaded = store.load_user(&user.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Samantha");
        assert_eq!(store.load_all_users().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_does_not_cascade() {
        let store = Store::in_memory().unwrap();
        let g = group("g-1", "AB12CD");
        store.save_group(&g).unwrap();
        let player = Player::in_group("p-1", "A. Batter", g.id.clone());
        store.save_player(&player).unwrap();

        store.delete_group(&g.id).unwrap();
        assert_eq!(store.load_group(&g.id).unwrap(), None);
        // Dependent player remains, now dangling
        assert!(store.load_player(&player.id).unwrap().is_some());
    }

    #[test]
    fn test_clear_all_keeps_schema_version() {
        let store = Store::in_memory().unwrap();
        store.save_user(&User::new("u-1", "Sam")).unwrap();
        store.save_group(&group("g-1", "AB12CD")).unwrap();

        store.clear_all().unwrap();
        assert!(store.load_all_users().unwrap().is_empty());
        assert!(store.load_all_groups().unwrap().is_empty());
        assert_eq!(
            store.schema_version().unwrap(),
            crate::migration::SCHEMA_VERSION
        );
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scorebook.db");
        {
            let store = Store::open(&path).unwrap();
            store.save_user(&User::new("u-1", "Sam")).unwrap();
        }
        let store = Store::open(&path).unwrap();
        assert_eq!(store.load_all_users().unwrap().len(), 1);
    }
}
