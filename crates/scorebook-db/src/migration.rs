//! Schema migration plan.
//!
//! The store carries a singleton version row. On open, each step between
//! the stored version and [`SCHEMA_VERSION`] runs in order and stamps the
//! row when it completes, so a re-run (or a crash between steps) resumes
//! where it left off. A step only ever touches the collection it names;
//! collections absent from the plan are never dropped.
//!
//! History:
//! - v1: initial collections, created by the static model registry on open.
//! - v2: rewrites the `matches` collection so its `group_id` secondary
//!   table (introduced after v1 installs shipped) is populated.
//! - v3: adds the `invitations` collection. Additive only.

use crate::error::{Error, Result};
use crate::models::*;
use native_db::*;
use tracing::info;

/// Schema version this build writes and expects.
pub const SCHEMA_VERSION: u32 = 3;

/// Migrate the store up to [`SCHEMA_VERSION`]. Idempotent.
pub(crate) fn run(db: &Database<'static>) -> Result<()> {
    let from = current_version(db)?;
    if from > SCHEMA_VERSION {
        return Err(Error::Migration(format!(
            "store is at schema version {from}, newer than supported version {SCHEMA_VERSION}"
        )));
    }
    for target in (from + 1)..=SCHEMA_VERSION {
        apply_step(db, target)?;
        stamp(db, target)?;
        info!(version = target, "schema migration step applied");
    }
    Ok(())
}

/// Read the stored schema version; 0 for a store never migrated.
pub(crate) fn current_version(db: &Database<'static>) -> Result<u32> {
    let r = db.r_transaction()?;
    let meta: Option<StoredSchemaMeta> = r.get().primary(StoredSchemaMeta::KEY.to_string())?;
    Ok(meta.map(|m| m.version).unwrap_or(0))
}

fn apply_step(db: &Database<'static>, target: u32) -> Result<()> {
    match target {
        // Collections and index tables exist once the model registry has
        // been applied at open; nothing to rewrite.
        1 => Ok(()),
        2 => rebuild_matches(db),
        // Invitations collection is additive.
        3 => Ok(()),
        other => Err(Error::Migration(format!(
            "no migration step defined for version {other}"
        ))),
    }
}

fn stamp(db: &Database<'static>, version: u32) -> Result<()> {
    let rw = db.rw_transaction()?;
    rw.upsert(StoredSchemaMeta::at_version(version))?;
    rw.commit()?;
    Ok(())
}

/// Rewrite every match row in one transaction so secondary key tables are
/// recomputed from current data. Destructive only to stale index entries;
/// row payloads are preserved.
fn rebuild_matches(db: &Database<'static>) -> Result<()> {
    let ids: Vec<String> = {
        let r = db.r_transaction()?;
        let scan = r.scan().primary::<StoredMatch>()?;
        let iter = scan.all()?;
        let rows: std::result::Result<Vec<StoredMatch>, _> = iter.collect();
        let rows = rows.map_err(|e| Error::Database(e.to_string()))?;
        rows.into_iter().map(|m| m.id).collect()
    };

    let rw = db.rw_transaction()?;
    for id in ids {
        if let Some(row) = rw.get().primary::<StoredMatch>(id)? {
            let copy = row.clone();
            rw.remove(row)?;
            rw.upsert(copy)?;
        }
    }
    rw.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use chrono::Utc;
    use scorebook_core::{GroupId, Match};

    #[test]
    fn test_fresh_store_is_stamped() {
        let store = Store::in_memory().unwrap();
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_rerun_is_a_no_op() {
        let store = Store::in_memory().unwrap();
        run(&store.db).unwrap();
        run(&store.db).unwrap();
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_downgrade_is_refused() {
        let store = Store::in_memory().unwrap();
        let rw = store.db.rw_transaction().unwrap();
        rw.upsert(StoredSchemaMeta::at_version(SCHEMA_VERSION + 1))
            .unwrap();
        rw.commit().unwrap();

        assert!(matches!(run(&store.db), Err(Error::Migration(_))));
    }

    #[test]
    fn test_rebuild_preserves_match_rows() {
        let store = Store::in_memory().unwrap();
        let m = Match::new("m-1", GroupId::new("g-1"), "Home", "Away", Utc::now());
        store.save_match(&m).unwrap();

        rebuild_matches(&store.db).unwrap();

        assert_eq!(store.load_match(&m.id).unwrap(), Some(m.clone()));
        assert_eq!(store.matches_in_group(&m.group_id).unwrap(), vec![m]);
    }
}
