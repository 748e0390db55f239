//! Invite code generation.

use crate::error::{Error, Result};
use rand::Rng;
use scorebook_core::{InviteCode, INVITE_CODE_LEN};
use scorebook_db::Store;

/// Characters an invite code is drawn from.
pub const CODE_CHARSET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Attempts before giving up on finding an unused code.
const MAX_ATTEMPTS: usize = 100;

/// Generate a random 6-character code.
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> InviteCode {
    let code: String = (0..INVITE_CODE_LEN)
        .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
        .collect();
    InviteCode::new(code)
}

/// Generate a code no existing group uses.
///
/// Uniqueness across groups is an invariant of the data model; the code
/// space (36^6) makes a retry rare, but the check is still made against
/// the store every time.
pub fn unique_code(store: &Store) -> Result<InviteCode> {
    let mut rng = rand::thread_rng();
    for _ in 0..MAX_ATTEMPTS {
        let code = generate_code(&mut rng);
        if store.groups_by_invite_code(code.as_str())?.is_empty() {
            return Ok(code);
        }
    }
    Err(Error::CodeSpace)
}
