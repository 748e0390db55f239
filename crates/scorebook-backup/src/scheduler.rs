//! Periodic backup driver.
//!
//! The scheduler is an explicit object owned by the application's
//! lifecycle root: started once, stopped once. An immediate snapshot is
//! taken at start, then one per interval. Stopping signals the driver
//! thread and waits for it; an in-flight snapshot is awaited, never
//! interrupted.

use crate::engine::{BackupEngine, SnapshotOutcome};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Handle to the periodic backup thread.
pub struct BackupScheduler {
    shutdown: mpsc::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl BackupScheduler {
    /// Start the driver: snapshot now, then every `interval`.
    pub fn start(engine: Arc<BackupEngine>, interval: Duration) -> Self {
        let (shutdown, signal) = mpsc::channel();
        let handle = thread::spawn(move || {
            log_outcome(&engine.create_snapshot());
            loop {
                match signal.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        log_outcome(&engine.create_snapshot());
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });
        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Signal shutdown and wait for the driver thread to finish.
    ///
    /// Must be called before process teardown so no snapshot write races
    /// it.
    pub fn stop(mut self) {
        let _ = self.shutdown.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for BackupScheduler {
    fn drop(&mut self) {
        // Backstop when stop() was never called: signal, but do not block
        let _ = self.shutdown.send(());
    }
}

fn log_outcome(outcome: &SnapshotOutcome) {
    match outcome {
        SnapshotOutcome::Written { tier, bytes } => {
            debug!(tier, bytes, "periodic snapshot written");
        }
        SnapshotOutcome::Skipped => debug!("periodic snapshot skipped"),
        SnapshotOutcome::Failed { reason } => {
            warn!("periodic snapshot failed: {reason}");
        }
    }
}
