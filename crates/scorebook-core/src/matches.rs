//! Match record
//!
//! Scoring and statistics are computed elsewhere; this is the persisted
//! fixture and its result.

use crate::identity::{GroupId, MatchId, PlayerId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Abandoned,
}

/// Final outcome of a completed match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Winning team name, or None for a tie/no-result
    pub winner: Option<String>,
    /// Human-readable summary, e.g. "won by 24 runs"
    pub summary: String,
}

/// A match played within a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Primary key, immutable once assigned
    pub id: MatchId,
    /// Group the match belongs to
    pub group_id: GroupId,
    pub home_team: String,
    pub away_team: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: MatchStatus,
    /// Players selected for this match
    pub players: Vec<PlayerId>,
    pub result: Option<MatchResult>,
}

impl Match {
    /// Create a scheduled match
    pub fn new(
        id: impl Into<MatchId>,
        group_id: GroupId,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            group_id,
            home_team: home_team.into(),
            away_team: away_team.into(),
            scheduled_at,
            status: MatchStatus::Scheduled,
            players: Vec::new(),
            result: None,
        }
    }

    /// A match that has not finished
    pub fn is_open(&self) -> bool {
        matches!(self.status, MatchStatus::Scheduled | MatchStatus::InProgress)
    }

    /// A match scheduled within the last `days` days
    pub fn is_newer_than(&self, days: i64, now: DateTime<Utc>) -> bool {
        self.scheduled_at > now - Duration::days(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_recent() {
        let now = Utc::now();
        let mut m = Match::new("m-1", GroupId::new("g-1"), "Home", "Away", now);
        assert!(m.is_open());
        assert!(m.is_newer_than(30, now));

        m.status = MatchStatus::Completed;
        assert!(!m.is_open());

        m.scheduled_at = now - Duration::days(45);
        assert!(!m.is_newer_than(30, now));
    }
}
