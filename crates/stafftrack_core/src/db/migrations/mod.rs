//! Container schema steps for the blob database.

use crate::store::{StoreError, StoreResult};
use log::info;
use rusqlite::Connection;

const USER_VERSION: &str = "user_version";

/// One schema step. `version` doubles as the resulting `user_version`.
#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "kv_blobs",
    sql: include_str!("0001_init.sql"),
}];

/// Schema version a freshly opened container ends up at.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Reads the container's current `user_version`.
pub fn schema_version(conn: &Connection) -> StoreResult<u32> {
    let version = conn.pragma_query_value(None, USER_VERSION, |row| row.get(0))?;
    Ok(version)
}

/// Brings the container at `location` up to [`latest_version`].
///
/// Returns the versions applied by this call, oldest first; empty when the
/// container was already current. All pending steps commit together.
///
/// # Errors
/// - [`StoreError::SchemaTooNew`] when the container is ahead of this binary.
/// - [`StoreError::Sqlite`] when a step fails; nothing is committed then.
pub fn apply_migrations(conn: &mut Connection, location: &str) -> StoreResult<Vec<u32>> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(StoreError::SchemaTooNew {
            location: location.to_string(),
            found,
            supported,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > found)
        .collect();
    if pending.is_empty() {
        return Ok(Vec::new());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, USER_VERSION, step.version)?;
    }
    tx.commit()?;

    for step in &pending {
        info!(
            "event=db_migrate module=db status=ok location={location} version={} step={}",
            step.version, step.name
        );
    }
    Ok(pending.iter().map(|step| step.version).collect())
}
