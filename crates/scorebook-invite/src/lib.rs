//! Scorebook Invite - Join tokens and group invitation protocol
//!
//! Lets a user join a group by following a link or entering a code, with
//! no network round trip:
//! - Invite-code generation, unique across groups
//! - Opaque, time-limited join tokens (`generate -> encode -> decode`)
//! - Multi-strategy code resolution with a security equality check
//! - The idempotent join mutation
//!
//! Tokens are unsigned by design; the protection is code entropy plus a
//! 24-hour expiry checked at every decode.

mod code;
mod error;
mod join;
mod resolver;
mod share;
mod token;

pub use code::{generate_code, unique_code, CODE_CHARSET};
pub use error::{Error, Result};
pub use join::join;
pub use resolver::{find_by_code, resolve_group};
pub use share::{build_join_link, build_share_message, parse_join_link};
pub use token::{JoinToken, TOKEN_TTL_HOURS};
