//! Academic year labels.
//!
//! An academic year starts in September and is written `YYYY-YY`, e.g.
//! `2024-25`. Labels are compared as strings only; they are never parsed back
//! into numbers because legacy documents may hold arbitrary text.

use chrono::{Datelike, NaiveDate};

/// Year assigned to logs persisted before the field existed.
pub const DEFAULT_ACADEMIC_YEAR: &str = "2024-25";

/// Group key for logs with an empty academic year.
pub const UNKNOWN_YEAR: &str = "Unknown";

const ACADEMIC_YEAR_START_MONTH: u32 = 9;

/// Formats the label of the academic year starting in `start_year`.
pub fn academic_year_label(start_year: i32) -> String {
    format!("{start_year}-{:02}", (start_year + 1).rem_euclid(100))
}

/// Returns the academic year that `date` falls into.
pub fn academic_year_for(date: NaiveDate) -> String {
    let year = date.year();
    if date.month() >= ACADEMIC_YEAR_START_MONTH {
        academic_year_label(year)
    } else {
        academic_year_label(year - 1)
    }
}

/// Returns selectable years, from one before `current_year` to two after.
pub fn academic_year_options(current_year: i32) -> Vec<String> {
    (-1..3)
        .map(|offset| academic_year_label(current_year + offset))
        .collect()
}
