//! Backup configuration.

use std::path::{Path, PathBuf};

/// Default byte budget, sized for browser-class local storage ceilings.
pub const DEFAULT_BUDGET_BYTES: u64 = 4 * 1024 * 1024;

/// Snapshot file name at the primary slot.
pub const PRIMARY_SLOT_FILE: &str = "snapshot.json";

/// Snapshot file name at the fallback slot.
pub const FALLBACK_SLOT_FILE: &str = "snapshot.fallback.json";

/// Configuration for the backup engine.
///
/// Snapshots are kept at two fixed, independent slots under the given
/// directory; the byte budget caps the serialized size of a snapshot and
/// feeds the quota estimate.
#[derive(Debug, Clone)]
pub struct BackupConfig {
    budget_bytes: u64,
    primary_path: PathBuf,
    fallback_path: PathBuf,
}

impl BackupConfig {
    /// Create a configuration with both slots under `dir` and the default
    /// budget.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            budget_bytes: DEFAULT_BUDGET_BYTES,
            primary_path: dir.join(PRIMARY_SLOT_FILE),
            fallback_path: dir.join(FALLBACK_SLOT_FILE),
        }
    }

    /// Set the byte budget. Clamped to at least 1.
    pub fn with_budget(mut self, bytes: u64) -> Self {
        self.budget_bytes = bytes.max(1);
        self
    }

    /// The configured byte budget.
    pub fn budget_bytes(&self) -> u64 {
        self.budget_bytes
    }

    /// Path of the primary snapshot slot.
    pub fn primary_path(&self) -> &Path {
        &self.primary_path
    }

    /// Path of the fallback snapshot slot.
    pub fn fallback_path(&self) -> &Path {
        &self.fallback_path
    }
}
