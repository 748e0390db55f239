//! Scorebook Core - Domain records for the persistence layer
//!
//! This crate provides the record types shared by the store, backup, and
//! invitation crates:
//! - Typed string identifiers (`UserId`, `GroupId`, ..., `InviteCode`)
//! - Entity records (`User`, `Group`, `Player`, `Match`, `Invitation`,
//!   `Setting`)
//! - The `Record` tagged union for code that handles records generically
//!
//! Ids are immutable once assigned and unique within their collection.
//! Referential integrity between records is not enforced here or by the
//! store; the integrity checker reports violations after the fact.

mod error;
mod group;
mod identity;
mod invitation;
mod matches;
mod player;
mod record;
mod setting;
mod user;

pub use error::{Error, Result};
pub use group::{Group, GroupMember, GroupSettings, Permissions, Role};
pub use identity::{
    GroupId, InvitationId, InviteCode, MatchId, PlayerId, UserId, INVITE_CODE_LEN,
};
pub use invitation::{Invitation, InvitationStatus};
pub use matches::{Match, MatchResult, MatchStatus};
pub use player::{Player, PlayerStats};
pub use record::{Record, RecordKind};
pub use setting::Setting;
pub use user::User;
