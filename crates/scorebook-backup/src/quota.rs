//! Storage quota estimation.

use crate::config::BackupConfig;
use std::fs;
use std::path::Path;

/// Usage percentage above which a snapshot cycle is skipped entirely.
pub const QUOTA_SKIP_THRESHOLD: f64 = 80.0;

/// Estimate how much of the byte budget this subsystem currently uses.
///
/// Sums the on-disk size of both snapshot slots against the configured
/// budget and returns a percentage. Missing slots count as zero.
pub fn usage_percent(config: &BackupConfig) -> f64 {
    let used = slot_bytes(config.primary_path()) + slot_bytes(config.fallback_path());
    (used as f64 / config.budget_bytes() as f64) * 100.0
}

fn slot_bytes(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
