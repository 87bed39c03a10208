//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate the pure mutation engine and the document store.
//! - Keep UI/FFI/CLI layers decoupled from storage details.

pub mod staff_track_service;
