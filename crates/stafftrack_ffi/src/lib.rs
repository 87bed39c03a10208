//! Flutter-facing bindings for StaffTrack core.

pub mod api;
