//! Report table construction.

use crate::engine::aggregate::{filtered_logs, group_by_year, StaffFilter};
use crate::model::app_data::{AppData, UNKNOWN_STAFF};
use crate::model::event_log::EventLog;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

const REPORT_PREFIX: &str = "StaffTrack";
const DATE_FORMAT: &str = "%Y-%m-%d";

static UNSAFE_FILE_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").expect("valid file name regex"));

/// Renderer-independent report content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub title: String,
    /// Lines printed under the title (generation date, scope).
    pub subtitle_lines: Vec<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// File name without extension; the renderer supplies the extension.
    pub file_stem: String,
}

impl ReportTable {
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{extension}", self.file_stem)
    }
}

/// Formats a value the way it is stored: `1`, `-1`, `0.5`.
pub fn format_value(value: f64) -> String {
    value.to_string()
}

/// Formats an impact with an explicit `+` on positive values.
pub fn format_impact(value: f64) -> String {
    if value > 0.0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

/// Replaces every character outside `[A-Za-z0-9]` with `_`.
pub fn safe_file_component(value: &str) -> String {
    UNSAFE_FILE_CHARS_RE.replace_all(value, "_").into_owned()
}

/// Report of the dashboard table under `filter`.
pub fn dashboard_report(data: &AppData, filter: &StaffFilter, today: NaiveDate) -> ReportTable {
    let date = today.format(DATE_FORMAT).to_string();
    let (title, scope, file_stem) = match filter {
        StaffFilter::All => (
            format!("{REPORT_PREFIX} Report: All Data"),
            "Scope: All Staff Records (Unfiltered)",
            format!("{REPORT_PREFIX}_AllData_{date}"),
        ),
        StaffFilter::Staff(id) => {
            let name = data.staff_name_or(id, UNKNOWN_STAFF);
            (
                format!("{REPORT_PREFIX} Report: {name}"),
                "Scope: Individual Staff Record",
                format!(
                    "{REPORT_PREFIX}_Filtered_{}_{date}",
                    safe_file_component(name)
                ),
            )
        }
    };

    let rows = filtered_logs(data, filter)
        .into_iter()
        .map(|log| {
            let year = if log.academic_year.is_empty() {
                "-".to_string()
            } else {
                log.academic_year.clone()
            };
            vec![
                log.date.to_string(),
                year,
                data.staff_name_or(&log.staff_id, UNKNOWN_STAFF).to_string(),
                data.event_type_name(&log.event_type_id).to_string(),
                format_value(log.value),
                log.notes.clone(),
            ]
        })
        .collect();

    ReportTable {
        title,
        subtitle_lines: vec![format!("Generated on {date}"), scope.to_string()],
        columns: columns(&["Date", "Year", "Staff Member", "Event Type", "Impact", "Notes"]),
        rows,
        file_stem,
    }
}

/// Report of every log grouped under `year` (use `Unknown` for blank years).
pub fn year_report(data: &AppData, year: &str, today: NaiveDate) -> ReportTable {
    let groups = group_by_year(data);
    let rows = groups
        .logs(year)
        .iter()
        .map(|log| year_row(data, log))
        .collect();

    ReportTable {
        title: format!("{REPORT_PREFIX} Report: Academic Year {year}"),
        subtitle_lines: vec![format!("Generated on {}", today.format(DATE_FORMAT))],
        columns: columns(&["Date", "Staff Member", "Event Type", "Value", "Notes"]),
        rows,
        file_stem: format!("{REPORT_PREFIX}_{year}"),
    }
}

fn year_row(data: &AppData, log: &EventLog) -> Vec<String> {
    vec![
        log.date.to_string(),
        data.staff_name_or(&log.staff_id, UNKNOWN_STAFF).to_string(),
        data.event_type_name(&log.event_type_id).to_string(),
        format_value(log.value),
        log.notes.clone(),
    ]
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}
