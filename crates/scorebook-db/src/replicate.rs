//! Cloud replication seam.
//!
//! Replication is best-effort and strictly one-way out of the store: the
//! store notifies the replicator after a commit, never before, and nothing
//! about local persistence changes when no replicator is attached.

use scorebook_core::Record;

/// The mutation being replicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicateOp {
    Put,
    Delete,
}

/// Fire-and-forget replication sink.
///
/// Implementations must not block the caller and must swallow their own
/// failures; the signature is infallible on purpose. A slow network client
/// should enqueue the record and return immediately.
pub trait Replicator: Send + Sync {
    fn replicate(&self, op: ReplicateOp, record: &Record);
}

/// Replicator that drops everything.
pub struct NoopReplicator;

impl Replicator for NoopReplicator {
    fn replicate(&self, _op: ReplicateOp, _record: &Record) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use scorebook_core::{RecordKind, User, UserId};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<(ReplicateOp, RecordKind, String)>>,
    }

    impl Replicator for Recording {
        fn replicate(&self, op: ReplicateOp, record: &Record) {
            self.seen
                .lock()
                .unwrap()
                .push((op, record.kind(), record.id().to_string()));
        }
    }

    #[test]
    fn test_store_notifies_after_mutations() {
        let recording = Arc::new(Recording::default());
        let store = Store::in_memory()
            .unwrap()
            .with_replicator(recording.clone());

        let user = User::new("u-1", "Sam");
        store.save_user(&user).unwrap();
        store.delete_user(&user.id).unwrap();
        // Deleting a missing record does not notify
        store.delete_user(&UserId::new("missing")).unwrap();

        let seen = recording.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (ReplicateOp::Put, RecordKind::User, "u-1".to_string()),
                (ReplicateOp::Delete, RecordKind::User, "u-1".to_string()),
            ]
        );
    }

    #[test]
    fn test_failed_batch_does_not_notify() {
        let recording = Arc::new(Recording::default());
        let store = Store::in_memory()
            .unwrap()
            .with_replicator(recording.clone());

        let batch = vec![User::new("u-1", "Sam"), User::new("", "No Id")];
        assert!(store.save_users(&batch).is_err());
        assert!(recording.seen.lock().unwrap().is_empty());
    }
}
