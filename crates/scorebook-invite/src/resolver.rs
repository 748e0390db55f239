//! Invite-code resolution.
//!
//! Resolution is an ordered list of strategies tried until one produces a
//! group: the invite-code index first (which itself falls back to a scan
//! when the index is unavailable), then pure comparisons over all groups,
//! ending with a normalized comparison for hand-entered codes.
//!
//! The invite code is the ground truth. A group reachable by id whose
//! current code does not match is a rejected state, never a resolution;
//! anything else would let a stale or forged token attach a user to an
//! unrelated group.

use crate::error::{Error, Result};
use scorebook_core::{Group, GroupId, InviteCode};
use scorebook_db::Store;
use tracing::debug;

/// A pure lookup over the loaded group list.
type Strategy = fn(&[Group], &str) -> Option<Group>;

/// Scan strategies in the order they are tried after the index fast path.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("exact", exact_match),
    ("normalized", normalized_match),
];

fn exact_match(groups: &[Group], code: &str) -> Option<Group> {
    groups.iter().find(|g| g.invite_code.as_str() == code).cloned()
}

/// Last resort for user-entered codes: trim and uppercase both sides.
fn normalized_match(groups: &[Group], code: &str) -> Option<Group> {
    let wanted = InviteCode::normalized(code);
    groups
        .iter()
        .find(|g| InviteCode::normalized(g.invite_code.as_str()) == wanted)
        .cloned()
}

/// Resolve the group a decoded token refers to.
///
/// The resolved group's id must equal the token's group id; a mismatch in
/// either direction is [`Error::SecurityMismatch`].
pub fn resolve_group(store: &Store, group_id: &GroupId, code: &str) -> Result<Group> {
    match lookup_by_code(store, code)? {
        Some(group) => confirm(group, group_id),
        None => {
            // Reachable by id alone, with a code that does not match
            if store.load_group(group_id)?.is_some() {
                return Err(Error::SecurityMismatch);
            }
            Err(Error::NotFound)
        }
    }
}

/// Manual-entry path: resolve a group by code alone.
pub fn find_by_code(store: &Store, code: &str) -> Result<Group> {
    lookup_by_code(store, code)?.ok_or(Error::NotFound)
}

fn lookup_by_code(store: &Store, code: &str) -> Result<Option<Group>> {
    // Fast path: the invite-code index
    if let Some(group) = store.groups_by_invite_code(code)?.into_iter().next() {
        return Ok(Some(group));
    }
    let all = store.load_all_groups()?;
    for (name, strategy) in STRATEGIES {
        if let Some(group) = strategy(&all, code) {
            debug!(strategy = %name, group = %group.id, "invite code resolved by scan");
            return Ok(Some(group));
        }
    }
    Ok(None)
}

fn confirm(group: Group, group_id: &GroupId) -> Result<Group> {
    if &group.id == group_id {
        Ok(group)
    } else {
        Err(Error::SecurityMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorebook_core::UserId;

    fn store_with_group(id: &str, code: &str) -> Store {
        let store = Store::in_memory().unwrap();
        store
            .save_group(&Group::new(
                id,
                "Test CC",
                UserId::new("u-1"),
                InviteCode::new(code),
            ))
            .unwrap();
        store
    }

    #[test]
    fn test_resolves_by_exact_code() {
        let store = store_with_group("g-1", "AB12CD");
        let group = resolve_group(&store, &GroupId::new("g-1"), "AB12CD").unwrap();
        assert_eq!(group.id.as_str(), "g-1");
    }

    #[test]
    fn test_resolves_hand_entered_code() {
        let store = store_with_group("g-1", "AB12CD");
        let group = find_by_code(&store, "  ab12cd ").unwrap();
        assert_eq!(group.id.as_str(), "g-1");
    }

    #[test]
    fn test_unknown_code_and_id_is_not_found() {
        let store = store_with_group("g-1", "AB12CD");
        assert!(matches!(
            resolve_group(&store, &GroupId::new("g-9"), "ZZ99XX"),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn test_id_match_with_wrong_code_is_rejected() {
        let store = store_with_group("g-1", "AB12CD");
        // The group exists, but the token carries a code it never had
        assert!(matches!(
            resolve_group(&store, &GroupId::new("g-1"), "ZZ99XX"),
            Err(Error::SecurityMismatch)
        ));
    }

    #[test]
    fn test_code_match_for_a_different_group_is_rejected() {
        let store = store_with_group("g-1", "AB12CD");
        store
            .save_group(&Group::new(
                "g-2",
                "Other CC",
                UserId::new("u-1"),
                InviteCode::new("ZZ99XX"),
            ))
            .unwrap();
        // Token claims g-1 but carries g-2's code
        assert!(matches!(
            resolve_group(&store, &GroupId::new("g-1"), "ZZ99XX"),
            Err(Error::SecurityMismatch)
        ));
    }

    #[test]
    fn test_strategy_order() {
        let names: Vec<&str> = STRATEGIES.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["exact", "normalized"]);
    }

    #[test]
    fn test_normalized_strategy_alone() {
        let groups = vec![Group::new(
            "g-1",
            "Test CC",
            UserId::new("u-1"),
            InviteCode::new("AB12CD"),
        )];
        assert!(exact_match(&groups, "ab12cd").is_none());
        assert!(normalized_match(&groups, "ab12cd").is_some());
    }
}
