//! SQLite container for the blob store.
//!
//! # Responsibility
//! - Open connections that `SqliteBlobStore` can use right away.
//! - Keep the `kv_blobs` table at the schema version this binary expects.
//!
//! # Invariants
//! - Container schema is tracked via `PRAGMA user_version`, separately from
//!   the document upgrades done by `store::migrate`.
//! - A database written by a newer binary is refused, never downgraded.
//! - Failures surface as `StoreError`, the same type blob reads and writes use.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, MEMORY_LOCATION};
