//! Schema metadata row.

use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored schema version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 7, version = 1)]
#[native_db]
pub struct StoredSchemaMeta {
    /// Always "schema" - single row.
    #[primary_key]
    pub id: String,
    /// Schema version the store was last migrated to.
    pub version: u32,
}

impl StoredSchemaMeta {
    /// The fixed primary key of the singleton row.
    pub const KEY: &'static str = "schema";

    /// Create the singleton row at a version.
    pub fn at_version(version: u32) -> Self {
        Self {
            id: Self::KEY.to_string(),
            version,
        }
    }
}
