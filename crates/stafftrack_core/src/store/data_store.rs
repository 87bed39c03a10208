//! Document store: the only reader and writer of the persisted `AppData`.
//!
//! # Responsibility
//! - Load the document under the versioned storage key, seeding it when absent.
//! - Upgrade legacy documents immediately after parsing.
//! - Save the whole document, last write wins.
//!
//! # Invariants
//! - `load` never fails: read errors and malformed documents fall back to the
//!   seed document after logging.
//! - `save` never fails: it logs and reports `false`, the in-memory document
//!   stays authoritative.
//! - No optimistic concurrency. A second writer silently clobbers the first.

use super::migrate::migrate_document;
use super::seed::seed_document;
use super::{BlobStore, StoreResult};
use crate::model::app_data::AppData;
use chrono::{Local, NaiveDate};
use log::{error, info, warn};
use serde_json::Value;

/// Storage key; bump the suffix when the shape changes incompatibly.
pub const STORAGE_KEY: &str = "stafftrack_data_v5";

/// Loads and saves the aggregate document through a `BlobStore`.
pub struct DataStore<S: BlobStore> {
    blobs: S,
    key: String,
}

impl<S: BlobStore> DataStore<S> {
    /// Uses [`STORAGE_KEY`].
    pub fn new(blobs: S) -> Self {
        Self::with_key(blobs, STORAGE_KEY)
    }

    pub fn with_key(blobs: S, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn blobs(&self) -> &S {
        &self.blobs
    }

    /// Loads the document, seeding with today's local date when absent.
    pub fn load(&self) -> AppData {
        self.load_on(Local::now().date_naive())
    }

    /// Loads the document; `today` dates the seed logs if seeding is needed.
    pub fn load_on(&self, today: NaiveDate) -> AppData {
        let raw = match self.blobs.read(&self.key) {
            Ok(raw) => raw,
            Err(err) => {
                error!(
                    "event=store_load module=store status=fallback error_code=read_failed error={err}"
                );
                return seed_document(today);
            }
        };

        let Some(raw) = raw else {
            let seed = seed_document(today);
            info!("event=store_load module=store status=seeded");
            self.save(&seed);
            return seed;
        };

        match parse_document(&raw) {
            Ok((data, migrated)) => {
                info!(
                    "event=store_load module=store status=ok staff={} event_types={} logs={} migrated_logs={}",
                    data.staff.len(),
                    data.event_types.len(),
                    data.logs.len(),
                    migrated
                );
                data
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=fallback error_code=malformed_document error={err}"
                );
                seed_document(today)
            }
        }
    }

    /// Writes the whole document. Returns whether the write succeeded; the
    /// result may be ignored.
    pub fn save(&self, data: &AppData) -> bool {
        match self.try_save(data) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=store_save module=store status=error error_code=write_failed error={err}"
                );
                false
            }
        }
    }

    fn try_save(&self, data: &AppData) -> StoreResult<()> {
        let encoded = serde_json::to_string(data)?;
        self.blobs.write(&self.key, &encoded)
    }
}

/// Parses a stored document and applies upgrades.
///
/// Returns the document and the number of log entries an upgrade touched.
pub fn parse_document(raw: &str) -> Result<(AppData, usize), serde_json::Error> {
    let mut document: Value = serde_json::from_str(raw)?;
    let migrated = migrate_document(&mut document);
    let data = serde_json::from_value(document)?;
    Ok((data, migrated))
}
