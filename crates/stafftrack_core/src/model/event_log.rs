//! Event log entry.
//!
//! # Invariants
//! - `staff_id` and `event_type_id` may dangle after deletions.
//! - `value` is the realized impact and is independent from the event type's
//!   `default_value`.
//! - `date` text that is not a calendar date is preserved verbatim.

use super::event_type::EventTypeId;
use super::staff::StaffId;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Identifier of a log entry.
pub type EventLogId = String;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date of a log entry as stored.
///
/// Older documents may hold an empty or free-form date. Those are kept as
/// `Raw` so saving the document writes them back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDate {
    Day(NaiveDate),
    Raw(String),
}

impl LogDate {
    /// Parses `YYYY-MM-DD`; anything else is kept as raw text.
    pub fn parse(raw: &str) -> Self {
        match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(day) => Self::Day(day),
            Err(_) => Self::Raw(raw.to_string()),
        }
    }

    pub fn day(&self) -> Option<NaiveDate> {
        match self {
            Self::Day(day) => Some(*day),
            Self::Raw(_) => None,
        }
    }
}

impl From<NaiveDate> for LogDate {
    fn from(value: NaiveDate) -> Self {
        Self::Day(value)
    }
}

impl PartialEq<NaiveDate> for LogDate {
    fn eq(&self, other: &NaiveDate) -> bool {
        self.day() == Some(*other)
    }
}

impl Display for LogDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day(day) => write!(f, "{}", day.format(DATE_FORMAT)),
            Self::Raw(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for LogDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LogDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map_or_else(|| Self::Raw(String::new()), |raw| Self::parse(&raw)))
    }
}

/// One recorded event for one staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLog {
    pub id: EventLogId,
    pub staff_id: StaffId,
    pub event_type_id: EventTypeId,
    /// Serialized as `YYYY-MM-DD`, or as the original text for `Raw`.
    #[serde(default = "empty_date")]
    pub date: LogDate,
    /// Schooling year label such as `2024-25`; independent from `date`.
    pub academic_year: String,
    pub value: f64,
    #[serde(default)]
    pub notes: String,
}

fn empty_date() -> LogDate {
    LogDate::Raw(String::new())
}

#[cfg(test)]
mod tests {
    use super::{EventLog, LogDate};
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn calendar_dates_parse_and_other_text_is_kept() {
        let day = NaiveDate::from_ymd_opt(2024, 10, 1).expect("valid date");
        assert_eq!(LogDate::parse("2024-10-01"), LogDate::Day(day));
        assert_eq!(LogDate::parse(""), LogDate::Raw(String::new()));
        assert_eq!(LogDate::parse("last tuesday").to_string(), "last tuesday");
        assert_eq!(LogDate::parse("2024-02-30").day(), None);
    }

    #[test]
    fn unparseable_and_null_dates_decode_and_write_back() {
        let decoded: EventLog = serde_json::from_value(json!({
            "id": "a",
            "staffId": "1",
            "eventTypeId": "2",
            "date": null,
            "academicYear": "2024-25",
            "value": 1
        }))
        .expect("lenient date decode");
        assert_eq!(decoded.date, LogDate::Raw(String::new()));
        assert_eq!(decoded.notes, "");

        let mut raw = decoded.clone();
        raw.date = LogDate::parse("soon");
        let encoded = serde_json::to_value(&raw).expect("encode");
        assert_eq!(encoded["date"], "soon");
    }
}
