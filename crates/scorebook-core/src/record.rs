//! Tagged union over all persisted record types
//!
//! Used where code handles records generically: the replication seam and
//! the integrity checker's issue reporting.

use crate::group::Group;
use crate::invitation::Invitation;
use crate::matches::Match;
use crate::player::Player;
use crate::setting::Setting;
use crate::user::User;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The collection a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Player,
    Match,
    User,
    Group,
    Invitation,
    Setting,
}

impl RecordKind {
    /// Collection name as used in exports and snapshots
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Player => "players",
            RecordKind::Match => "matches",
            RecordKind::User => "users",
            RecordKind::Group => "groups",
            RecordKind::Invitation => "invitations",
            RecordKind::Setting => "settings",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Any persisted record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "record")]
pub enum Record {
    Player(Player),
    Match(Match),
    User(User),
    Group(Group),
    Invitation(Invitation),
    Setting(Setting),
}

impl Record {
    /// The collection this record belongs to
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Player(_) => RecordKind::Player,
            Record::Match(_) => RecordKind::Match,
            Record::User(_) => RecordKind::User,
            Record::Group(_) => RecordKind::Group,
            Record::Invitation(_) => RecordKind::Invitation,
            Record::Setting(_) => RecordKind::Setting,
        }
    }

    /// The record's id within its collection
    pub fn id(&self) -> &str {
        match self {
            Record::Player(p) => p.id.as_str(),
            Record::Match(m) => m.id.as_str(),
            Record::User(u) => u.id.as_str(),
            Record::Group(g) => g.id.as_str(),
            Record::Invitation(i) => i.id.as_str(),
            Record::Setting(s) => &s.id,
        }
    }
}

impl From<Player> for Record {
    fn from(p: Player) -> Self {
        Record::Player(p)
    }
}

impl From<Match> for Record {
    fn from(m: Match) -> Self {
        Record::Match(m)
    }
}

impl From<User> for Record {
    fn from(u: User) -> Self {
        Record::User(u)
    }
}

impl From<Group> for Record {
    fn from(g: Group) -> Self {
        Record::Group(g)
    }
}

impl From<Invitation> for Record {
    fn from(i: Invitation) -> Self {
        Record::Invitation(i)
    }
}

impl From<Setting> for Record {
    fn from(s: Setting) -> Self {
        Record::Setting(s)
    }
}
