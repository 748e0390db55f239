//! Backup engine: tiered snapshot creation and restore.

use crate::config::BackupConfig;
use crate::error::{Error, Result};
use crate::integrity::{check_integrity, IntegrityReport};
use crate::quota::{self, QUOTA_SKIP_THRESHOLD};
use crate::snapshot::{SnapshotData, SnapshotFile, TIERS};
use chrono::Utc;
use scorebook_db::Store;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a snapshot cycle did.
///
/// Snapshot creation is non-fatal by contract: the engine reports failure
/// as data and never panics or returns an error to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// A snapshot was written at the named tier.
    Written { tier: &'static str, bytes: u64 },
    /// Quota usage was over the threshold; nothing was written this cycle.
    Skipped,
    /// No tier could be written.
    Failed { reason: String },
}

/// Result of the startup pass.
#[derive(Debug)]
pub struct StartupReport {
    pub integrity: IntegrityReport,
    /// Whether a snapshot was replayed into the empty store.
    pub restored: bool,
}

/// Snapshot engine over a record store.
///
/// Reaches storage only through the [`Store`] API, never the storage
/// engine underneath it.
pub struct BackupEngine {
    store: Arc<Store>,
    config: BackupConfig,
}

impl BackupEngine {
    /// Create an engine for a store.
    pub fn new(store: Arc<Store>, config: BackupConfig) -> Self {
        Self { store, config }
    }

    /// The store this engine snapshots.
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Current quota usage as a percentage of the byte budget.
    pub fn usage_percent(&self) -> f64 {
        quota::usage_percent(&self.config)
    }

    /// Build and write a snapshot at the first tier that fits the budget.
    ///
    /// Skips the cycle entirely when usage is already over the threshold.
    /// A failed slot write discards both slots and retries the minimal
    /// tier once before giving up.
    pub fn create_snapshot(&self) -> SnapshotOutcome {
        let usage = self.usage_percent();
        if usage > QUOTA_SKIP_THRESHOLD {
            info!(usage_percent = usage, "quota pressure, skipping snapshot cycle");
            return SnapshotOutcome::Skipped;
        }
        match self.try_create() {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("snapshot failed: {e}");
                SnapshotOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn try_create(&self) -> Result<SnapshotOutcome> {
        let schema_version = self.store.schema_version()?;
        let mut smallest = u64::MAX;

        for tier in TIERS {
            let data = (tier.build)(&self.store)?;
            let bytes = self.serialize(schema_version, data)?;
            let len = bytes.len() as u64;
            smallest = smallest.min(len);
            if len > self.config.budget_bytes() {
                debug!(tier = tier.name, bytes = len, "tier over budget");
                continue;
            }
            return match self.write_slots(&bytes) {
                Ok(()) => {
                    info!(tier = tier.name, bytes = len, "snapshot written");
                    Ok(SnapshotOutcome::Written {
                        tier: tier.name,
                        bytes: len,
                    })
                }
                Err(e) => {
                    warn!(tier = tier.name, "slot write failed, retrying minimal: {e}");
                    self.retry_minimal(schema_version)
                }
            };
        }

        Err(Error::QuotaExceeded {
            needed: smallest,
            budget: self.config.budget_bytes(),
        })
    }

    /// Discard both slots and retry the minimal tier exactly once.
    fn retry_minimal(&self, schema_version: u32) -> Result<SnapshotOutcome> {
        self.discard_slots();
        let minimal = &TIERS[TIERS.len() - 1];
        let data = (minimal.build)(&self.store)?;
        let bytes = self.serialize(schema_version, data)?;
        let len = bytes.len() as u64;
        if len > self.config.budget_bytes() {
            return Err(Error::QuotaExceeded {
                needed: len,
                budget: self.config.budget_bytes(),
            });
        }
        self.write_slots(&bytes)?;
        info!(tier = minimal.name, bytes = len, "snapshot written after retry");
        Ok(SnapshotOutcome::Written {
            tier: minimal.name,
            bytes: len,
        })
    }

    fn serialize(&self, schema_version: u32, data: SnapshotData) -> Result<Vec<u8>> {
        let file = SnapshotFile {
            timestamp_epoch_millis: Utc::now().timestamp_millis(),
            schema_version,
            data,
        };
        serde_json::to_vec(&file).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Write the primary slot; mirror to the fallback slot best-effort.
    fn write_slots(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.config.primary_path().parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(self.config.primary_path(), bytes)?;
        if let Err(e) = fs::write(self.config.fallback_path(), bytes) {
            warn!("fallback slot write failed: {e}");
        }
        Ok(())
    }

    fn discard_slots(&self) {
        let _ = fs::remove_file(self.config.primary_path());
        let _ = fs::remove_file(self.config.fallback_path());
    }

    /// Replay the most recent snapshot into the store.
    ///
    /// Consults the primary slot, then the fallback slot. Returns
    /// `Ok(false)` when neither holds a readable snapshot. Otherwise all
    /// collections are cleared and replayed; replay order does not matter
    /// because saves never validate references. Running this twice with
    /// the same snapshot yields the same end state.
    pub fn restore_snapshot(&self) -> Result<bool> {
        let file = match self
            .read_slot(self.config.primary_path())
            .or_else(|| self.read_slot(self.config.fallback_path()))
        {
            Some(file) => file,
            None => return Ok(false),
        };

        self.store.clear_all()?;
        self.store.save_users(&file.data.users)?;
        self.store.save_groups(&file.data.groups)?;
        self.store.save_players(&file.data.players)?;
        self.store.save_matches(&file.data.matches)?;
        self.store.save_settings(&file.data.settings)?;
        info!(
            timestamp = file.timestamp_epoch_millis,
            schema_version = file.schema_version,
            "snapshot restored"
        );
        Ok(true)
    }

    fn read_slot(&self, path: &Path) -> Option<SnapshotFile> {
        let bytes = fs::read(path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(file) => Some(file),
            Err(e) => {
                warn!(path = %path.display(), "unreadable snapshot slot: {e}");
                None
            }
        }
    }

    /// Read-only integrity pass over the store.
    pub fn check_integrity(&self) -> Result<IntegrityReport> {
        check_integrity(&self.store)
    }

    /// Startup pass: report integrity, and restore a snapshot when the
    /// store is empty and one exists.
    pub fn startup(&self) -> Result<StartupReport> {
        let integrity = self.check_integrity()?;
        let restored = if self.store_is_empty()? {
            self.restore_snapshot()?
        } else {
            false
        };
        Ok(StartupReport {
            integrity,
            restored,
        })
    }

    fn store_is_empty(&self) -> Result<bool> {
        Ok(self.store.load_all_users()?.is_empty()
            && self.store.load_all_groups()?.is_empty()
            && self.store.load_all_players()?.is_empty()
            && self.store.load_all_matches()?.is_empty()
            && self.store.load_all_settings()?.is_empty())
    }
}
