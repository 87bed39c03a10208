//! Key-value blob storage and the document store built on it.
//!
//! # Responsibility
//! - Define the `BlobStore` contract (read/write one string value per key).
//! - Provide SQLite, file and in-memory backends.
//! - Host `DataStore`, which loads, upgrades and saves the `AppData` document.
//!
//! # Invariants
//! - Backends report failures as `StoreError`; `DataStore` swallows them
//!   after logging so callers never see a persistence error.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod data_store;
pub mod file;
pub mod memory;
pub mod migrate;
pub mod seed;
pub mod sqlite;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a blob backend.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// The blob database was written by a newer binary.
    SchemaTooNew {
        location: String,
        found: u32,
        supported: u32,
    },
    Io(std::io::Error),
    Encode(serde_json::Error),
    /// Backend refused the operation (quota, simulated outage, ...).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew {
                location,
                found,
                supported,
            } => write!(
                f,
                "blob database `{location}` has schema version {found}, newer than supported {supported}"
            ),
            Self::Io(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode document: {err}"),
            Self::Unavailable(message) => write!(f, "blob store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::SchemaTooNew { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Durable string storage addressed by key.
pub trait BlobStore {
    /// Returns the stored value, or `None` when the key was never written.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replaces the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> StoreResult<()>;
}

impl<S: BlobStore + ?Sized> BlobStore for &S {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).write(key, value)
    }
}
