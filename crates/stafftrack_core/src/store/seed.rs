//! Seed document used when nothing has been persisted yet.

use crate::model::academic_year::DEFAULT_ACADEMIC_YEAR;
use crate::model::app_data::AppData;
use crate::model::event_log::EventLog;
use crate::model::event_type::EventType;
use crate::model::staff::Staff;
use chrono::NaiveDate;

/// Returns the initial document. Both sample logs are dated `today`.
pub fn seed_document(today: NaiveDate) -> AppData {
    AppData {
        staff: vec![
            Staff::with_id("1", "Alice Johnson"),
            Staff::with_id("2", "Bob Smith"),
            Staff::with_id("3", "Charlie Davis"),
        ],
        event_types: vec![
            seed_type(
                "1",
                "Sick Leave",
                "Staff member absent due to illness",
                1.0,
                "#ef4444",
            ),
            seed_type(
                "2",
                "Class Cover",
                "Covering a class for a colleague",
                -1.0,
                "#3b82f6",
            ),
            seed_type(
                "3",
                "Training Day",
                "Attending mandatory training",
                0.0,
                "#f59e0b",
            ),
            seed_type(
                "4",
                "Late Arrival",
                "Arrived after shift start",
                0.5,
                "#ec4899",
            ),
        ],
        logs: vec![
            seed_log("101", "1", "2", today, -1.0, "Covered for Dave"),
            seed_log("102", "2", "1", today, 1.0, "Flu"),
        ],
    }
}

fn seed_type(
    id: &str,
    name: &str,
    description: &str,
    default_value: f64,
    color: &str,
) -> EventType {
    EventType {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        default_value,
        color: color.to_string(),
    }
}

fn seed_log(
    id: &str,
    staff_id: &str,
    event_type_id: &str,
    date: NaiveDate,
    value: f64,
    notes: &str,
) -> EventLog {
    EventLog {
        id: id.to_string(),
        staff_id: staff_id.to_string(),
        event_type_id: event_type_id.to_string(),
        date: date.into(),
        academic_year: DEFAULT_ACADEMIC_YEAR.to_string(),
        value,
        notes: notes.to_string(),
    }
}
