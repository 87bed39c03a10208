//! Domain model for staff event tracking.
//!
//! # Responsibility
//! - Define the three collections (staff, event types, logs) and the
//!   aggregate document that owns them.
//! - Keep the persisted JSON shape stable (`camelCase` wire names).
//!
//! # Invariants
//! - `Staff.id` and `EventType.id` are unique within their collection.
//! - Log -> staff and log -> event type links are soft references by id.
//!   A missing target is a valid state and resolves to a placeholder on read.

pub mod academic_year;
pub mod app_data;
pub mod event_log;
pub mod event_type;
pub mod staff;
