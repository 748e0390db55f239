//! The join mutation.

use crate::error::Result;
use scorebook_core::{Group, GroupMember, User};
use scorebook_db::Store;
use tracing::info;

/// Add a user to a group's member list and persist the group.
///
/// Idempotent: a user already in the member list gets the group back
/// unchanged, with no second membership entry and no store write.
pub fn join(store: &Store, user: &User, group: &Group) -> Result<Group> {
    if group.has_member(&user.id) {
        return Ok(group.clone());
    }
    let mut updated = group.clone();
    updated.members.push(GroupMember::member(user.id.clone()));
    store.save_group(&updated)?;
    info!(group = %updated.id, user = %user.id, "user joined group");
    Ok(updated)
}
