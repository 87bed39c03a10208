//! Derived read projections.
//!
//! # Responsibility
//! - Per-staff totals (sum of `value`, log count) under an optional filter.
//! - Per-academic-year grouping with a descending display order.
//! - Display rows resolving soft references to placeholders.
//!
//! # Invariants
//! - Projections are recomputed from scratch on every call.
//! - Staff order follows the document; logs keep their relative order.
//! - Year keys sort lexicographically, never numerically.

use crate::model::academic_year::UNKNOWN_YEAR;
use crate::model::app_data::{AppData, UNKNOWN};
use crate::model::event_log::EventLog;
use crate::model::staff::{Staff, StaffId};
use std::collections::BTreeMap;

/// Selection value meaning "every staff member".
pub const ALL_STAFF: &str = "all";

/// Scope of a staff-filtered projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StaffFilter {
    #[default]
    All,
    Staff(StaffId),
}

impl StaffFilter {
    /// Maps a UI selection (`all` or a staff id) to a filter.
    pub fn from_selection(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == ALL_STAFF {
            Self::All
        } else {
            Self::Staff(trimmed.to_string())
        }
    }

    pub fn matches(&self, staff_id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Staff(id) => id == staff_id,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// Aggregated impact for one staff member.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffTotal<'a> {
    pub staff: &'a Staff,
    pub total_score: f64,
    pub log_count: usize,
}

/// Sums log values per staff member in scope.
///
/// Staff without logs are included with a zero total. A filter naming an
/// unknown staff id yields an empty list.
pub fn staff_totals<'a>(data: &'a AppData, filter: &StaffFilter) -> Vec<StaffTotal<'a>> {
    data.staff
        .iter()
        .filter(|staff| filter.matches(&staff.id))
        .map(|staff| {
            let (total_score, log_count) = data
                .logs
                .iter()
                .filter(|log| log.staff_id == staff.id)
                .fold((0.0, 0), |(sum, count), log| (sum + log.value, count + 1));
            StaffTotal {
                staff,
                total_score,
                log_count,
            }
        })
        .collect()
}

/// Returns logs in scope, preserving document order.
pub fn filtered_logs<'a>(data: &'a AppData, filter: &StaffFilter) -> Vec<&'a EventLog> {
    data.logs
        .iter()
        .filter(|log| filter.matches(&log.staff_id))
        .collect()
}

/// Logs partitioned by academic year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearGroups<'a> {
    groups: BTreeMap<String, Vec<&'a EventLog>>,
}

impl<'a> YearGroups<'a> {
    /// Year keys in display order (descending).
    pub fn years(&self) -> Vec<&str> {
        self.groups.keys().rev().map(String::as_str).collect()
    }

    /// Logs of one year in their original relative order.
    pub fn logs(&self, year: &str) -> &[&'a EventLog] {
        self.groups.get(year).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates `(year, logs)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a EventLog])> + '_ {
        self.groups
            .iter()
            .rev()
            .map(|(year, logs)| (year.as_str(), logs.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Group key for a log: its academic year verbatim, or `Unknown` when empty.
pub fn year_key(log: &EventLog) -> &str {
    if log.academic_year.is_empty() {
        UNKNOWN_YEAR
    } else {
        log.academic_year.as_str()
    }
}

pub fn group_by_year(data: &AppData) -> YearGroups<'_> {
    let mut groups: BTreeMap<String, Vec<&EventLog>> = BTreeMap::new();
    for log in &data.logs {
        groups.entry(year_key(log).to_string()).or_default().push(log);
    }
    YearGroups { groups }
}

/// A log with its references resolved for display.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRow<'a> {
    pub log: &'a EventLog,
    /// Staff name, or `Unknown` when the staff member was removed.
    pub staff_name: &'a str,
    /// Event type name, or `Unknown Type` when the type was removed.
    pub event_type_name: &'a str,
    /// `None` when the event type was removed.
    pub color: Option<&'a str>,
}

pub fn log_rows<'a>(data: &'a AppData, filter: &StaffFilter) -> Vec<LogRow<'a>> {
    filtered_logs(data, filter)
        .into_iter()
        .map(|log| LogRow {
            log,
            staff_name: data.staff_name_or(&log.staff_id, UNKNOWN),
            event_type_name: data.event_type_name(&log.event_type_id),
            color: data
                .find_event_type(&log.event_type_id)
                .map(|kind| kind.color.as_str()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{StaffFilter, ALL_STAFF};

    #[test]
    fn selection_maps_all_and_ids() {
        assert_eq!(StaffFilter::from_selection(ALL_STAFF), StaffFilter::All);
        assert_eq!(StaffFilter::from_selection(""), StaffFilter::All);
        assert_eq!(
            StaffFilter::from_selection(" 42 "),
            StaffFilter::Staff("42".to_string())
        );
    }

    #[test]
    fn all_matches_everything() {
        assert!(StaffFilter::All.matches("anything"));
        assert!(!StaffFilter::Staff("a".to_string()).matches("b"));
    }
}
