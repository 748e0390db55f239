//! Application setting record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single keyed application setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    /// Setting key, used as the primary key
    pub id: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

impl Setting {
    /// Create a setting updated now
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            updated_at: Utc::now(),
        }
    }
}
