//! Scorebook Backup - Snapshot engine, integrity checker, and scheduler
//!
//! Protects against data loss under a hard storage-quota ceiling:
//! - Tiered, size-budgeted snapshots at two independent slots
//! - Restore with primary-then-fallback lookup
//! - Read-only referential integrity checking
//! - An explicit periodic driver owned by the application lifecycle
//!
//! Backup failure is non-fatal by design: a snapshot cycle that cannot
//! complete reports an outcome instead of erroring the caller.

mod config;
mod engine;
mod error;
mod exporter;
mod integrity;
mod quota;
mod scheduler;
mod snapshot;

pub use config::{BackupConfig, DEFAULT_BUDGET_BYTES, FALLBACK_SLOT_FILE, PRIMARY_SLOT_FILE};
pub use engine::{BackupEngine, SnapshotOutcome, StartupReport};
pub use error::{Error, Result};
pub use exporter::Exporter;
pub use integrity::{check_integrity, IntegrityIssue, IntegrityReport, IntegrityStats};
pub use quota::{usage_percent, QUOTA_SKIP_THRESHOLD};
pub use scheduler::BackupScheduler;
pub use snapshot::{
    SnapshotData, SnapshotFile, MATCH_WINDOW_DAYS, MINIMAL_GROUP_CAP, MINIMAL_USER_CAP,
    WINDOW_GROUP_CAP, WINDOW_MATCH_CAP, WINDOW_PLAYER_CAP, WINDOW_USER_CAP,
};
