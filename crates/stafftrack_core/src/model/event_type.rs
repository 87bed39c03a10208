//! Event type template.
//!
//! # Invariants
//! - `default_value` is only a proposal copied onto new logs. It is never
//!   re-synced to logs that already exist.
//! - `color` is an opaque display token passed through untouched.

use serde::{Deserialize, Serialize};

/// Identifier of an event type.
pub type EventTypeId = String;

/// Colour assigned when the caller does not choose one.
pub const DEFAULT_EVENT_TYPE_COLOR: &str = "#3b82f6";

/// Template describing one kind of event (absence, cover duty, training...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventType {
    pub id: EventTypeId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Signed impact proposed for new logs. Positive is burden, negative is
    /// contribution.
    pub default_value: f64,
    pub color: String,
}

impl EventType {
    /// Creates an event type with a freshly generated identifier.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        default_value: f64,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: crate::id::generate_id(),
            name: name.into(),
            description: description.into(),
            default_value,
            color: color.into(),
        }
    }
}
