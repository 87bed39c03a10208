//! Connection bootstrap for the blob database.
//!
//! # Invariants
//! - Returned connections have a busy timeout configured.
//! - Returned connections are at the latest container schema.

use super::migrations::apply_migrations;
use crate::store::{StoreError, StoreResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Location reported for in-memory connections.
pub const MEMORY_LOCATION: &str = ":memory:";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the blob database at `path`, creating and migrating it as needed.
///
/// Parent directories are not created; callers pass a path inside an
/// existing directory.
pub fn open_db(path: impl AsRef<Path>) -> StoreResult<Connection> {
    let path = path.as_ref();
    open_at(&path.display().to_string(), || Connection::open(path))
}

/// Opens a migrated in-memory blob database.
pub fn open_db_in_memory() -> StoreResult<Connection> {
    open_at(MEMORY_LOCATION, Connection::open_in_memory)
}

fn open_at(
    location: &str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> StoreResult<Connection> {
    let started_at = Instant::now();
    let opened = connect()
        .map_err(StoreError::from)
        .and_then(|mut conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            let applied = apply_migrations(&mut conn, location)?;
            Ok((conn, applied))
        });

    match opened {
        Ok((conn, applied)) => {
            info!(
                "event=db_open module=db status=ok location={location} migrations_applied={} duration_ms={}",
                applied.len(),
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error location={location} duration_ms={} error_code=db_open_failed error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}
