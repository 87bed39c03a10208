//! Pure document transforms and read projections.
//!
//! # Responsibility
//! - `mutation`: apply one command to an `AppData` and return the new one.
//! - `aggregate`: compute per-staff totals and per-year groupings.
//!
//! # Invariants
//! - Nothing in this module touches storage or logging backends' state.
//! - Every function is total over well-typed input.

pub mod aggregate;
pub mod mutation;
