//! Scorebook DB - Record store on native_db
//!
//! Provides durable, queryable storage for all record collections:
//! - Users, groups, players, matches, invitations, settings
//! - Secondary-index queries with a mandatory full-scan fallback
//! - Versioned schema migration, safe to re-run
//! - A best-effort cloud replication seam

mod error;
mod migration;
mod models;
mod queries;
mod replicate;
mod store;

pub use error::{Error, Result};
pub use migration::SCHEMA_VERSION;
pub use replicate::{NoopReplicator, ReplicateOp, Replicator};
pub use store::Store;
