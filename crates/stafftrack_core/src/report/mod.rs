//! Tabular reports over event logs.
//!
//! # Responsibility
//! - Build the report tables offered for download (dashboard view and one
//!   academic year).
//! - Hand tables to a `ReportRenderer` and turn renderer failures into a
//!   plain result message.
//!
//! # Invariants
//! - Dangling references render as `Unknown Staff` / `Unknown Type`.
//! - Row order follows the document's log order.

mod render;
mod table;

pub use render::{export_report, ExportResult, ReportError, ReportRenderer, TextTableRenderer};
pub use table::{
    dashboard_report, format_impact, format_value, safe_file_component, year_report, ReportTable,
};
