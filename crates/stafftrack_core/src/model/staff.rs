//! Staff member record.

use serde::{Deserialize, Serialize};

/// Identifier of a staff member.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type StaffId = String;

/// One staff member that events can be logged against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    /// Assigned at creation and never changed afterwards.
    pub id: StaffId,
    pub name: String,
}

impl Staff {
    /// Creates a staff member with a freshly generated identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(crate::id::generate_id(), name)
    }

    /// Creates a staff member with a caller-provided identifier.
    ///
    /// Used by seed data and import paths where identity already exists.
    pub fn with_id(id: impl Into<StaffId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
