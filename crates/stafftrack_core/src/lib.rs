//! Core domain logic for StaffTrack.
//! This crate is the single source of truth for the document, its cascade
//! rules and every derived projection.

pub mod config;
pub mod db;
pub mod engine;
pub mod id;
pub mod logging;
pub mod model;
pub mod report;
pub mod service;
pub mod store;
pub mod summary;

pub use config::AppConfig;
pub use engine::aggregate::{
    filtered_logs, group_by_year, log_rows, staff_totals, LogRow, StaffFilter, StaffTotal,
    YearGroups, ALL_STAFF,
};
pub use engine::mutation::{apply, Command};
pub use id::generate_id;
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::academic_year::{
    academic_year_for, academic_year_options, DEFAULT_ACADEMIC_YEAR, UNKNOWN_YEAR,
};
pub use model::app_data::{AppData, UNKNOWN, UNKNOWN_STAFF, UNKNOWN_TYPE};
pub use model::event_log::{EventLog, EventLogId, LogDate};
pub use model::event_type::{EventType, EventTypeId, DEFAULT_EVENT_TYPE_COLOR};
pub use model::staff::{Staff, StaffId};
pub use report::{
    dashboard_report, export_report, year_report, ExportResult, ReportRenderer, ReportTable,
    TextTableRenderer,
};
pub use service::staff_track_service::{
    NewEventLog, NewEventType, ServiceError, ServiceResult, StaffTrackService,
};
pub use store::data_store::{DataStore, STORAGE_KEY};
pub use store::file::FileBlobStore;
pub use store::memory::MemoryBlobStore;
pub use store::sqlite::SqliteBlobStore;
pub use store::{BlobStore, StoreError, StoreResult};
pub use summary::{generate_staff_summary, GeminiClient, SummaryClient, SummaryError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
