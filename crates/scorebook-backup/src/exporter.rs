//! Export all collections to JSON for external download.

use crate::error::{Error, Result};
use chrono::Utc;
use scorebook_core::{Group, Invitation, Match, Player, Setting, User};
use scorebook_db::Store;
use serde::Serialize;

/// Exporter over a record store.
pub struct Exporter<'a> {
    store: &'a Store,
}

impl<'a> Exporter<'a> {
    /// Create a new exporter.
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Export every collection as pretty-printed JSON.
    pub fn export_all(&self) -> Result<String> {
        let export = ExportData {
            exported_at_epoch_millis: Utc::now().timestamp_millis(),
            schema_version: self.store.schema_version()?,
            users: self.store.load_all_users()?,
            groups: self.store.load_all_groups()?,
            players: self.store.load_all_players()?,
            matches: self.store.load_all_matches()?,
            invitations: self.store.load_all_invitations()?,
            settings: self.store.load_all_settings()?,
        };
        serde_json::to_string_pretty(&export).map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// Data structure for a full export.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportData {
    exported_at_epoch_millis: i64,
    schema_version: u32,
    users: Vec<User>,
    groups: Vec<Group>,
    players: Vec<Player>,
    matches: Vec<Match>,
    invitations: Vec<Invitation>,
    settings: Vec<Setting>,
}
