//! Aggregate document holding every collection.
//!
//! # Responsibility
//! - Own `staff`, `eventTypes` and `logs` as one persisted unit.
//! - Provide lookup helpers used by every read site that resolves soft
//!   references.
//!
//! # Invariants
//! - `staff` and `event_types` are insertion ordered (append on create).
//! - `logs` is newest-insertion-first, independent of `date`.
//! - The document is always persisted whole; there is no partial write.

use super::event_log::EventLog;
use super::event_type::EventType;
use super::staff::Staff;
use serde::{Deserialize, Serialize};

/// Placeholder shown in tables for a log whose staff member no longer exists.
pub const UNKNOWN: &str = "Unknown";
/// Placeholder used in reports for a dangling staff reference.
pub const UNKNOWN_STAFF: &str = "Unknown Staff";
/// Placeholder for a dangling event type reference.
pub const UNKNOWN_TYPE: &str = "Unknown Type";

/// Aggregate root persisted under the storage key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    #[serde(default)]
    pub staff: Vec<Staff>,
    #[serde(default)]
    pub event_types: Vec<EventType>,
    #[serde(default)]
    pub logs: Vec<EventLog>,
}

impl AppData {
    /// Returns the staff member with `id`, if still present.
    pub fn find_staff(&self, id: &str) -> Option<&Staff> {
        self.staff.iter().find(|staff| staff.id == id)
    }

    /// Returns the event type with `id`, if still present.
    pub fn find_event_type(&self, id: &str) -> Option<&EventType> {
        self.event_types.iter().find(|kind| kind.id == id)
    }

    /// Resolves a staff name, falling back to `placeholder` for dangling ids.
    pub fn staff_name_or<'a>(&'a self, id: &str, placeholder: &'a str) -> &'a str {
        self.find_staff(id)
            .map(|staff| staff.name.as_str())
            .unwrap_or(placeholder)
    }

    /// Resolves an event type name, falling back to [`UNKNOWN_TYPE`].
    pub fn event_type_name(&self, id: &str) -> &str {
        self.find_event_type(id)
            .map(|kind| kind.name.as_str())
            .unwrap_or(UNKNOWN_TYPE)
    }
}
