//! In-place upgrades of a parsed document before typed decoding.
//!
//! # Invariants
//! - Each step is guarded by a field-presence check, not a version counter.
//! - Re-running a step on an upgraded document changes nothing.

use crate::model::academic_year::DEFAULT_ACADEMIC_YEAR;
use serde_json::{Map, Value};

const LOGS_FIELD: &str = "logs";
const ACADEMIC_YEAR_FIELD: &str = "academicYear";
const VALUE_FIELD: &str = "value";

/// Applies every upgrade step and returns how many log fields were changed.
pub fn migrate_document(document: &mut Value) -> usize {
    backfill_academic_year(document) + normalize_values(document)
}

fn logs_mut(document: &mut Value) -> impl Iterator<Item = &mut Map<String, Value>> {
    document
        .get_mut(LOGS_FIELD)
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object_mut)
}

/// Assigns [`DEFAULT_ACADEMIC_YEAR`] to logs whose year is absent, null or
/// empty.
fn backfill_academic_year(document: &mut Value) -> usize {
    let mut changed = 0;
    for log in logs_mut(document) {
        let missing = match log.get(ACADEMIC_YEAR_FIELD) {
            None | Some(Value::Null) => true,
            Some(Value::String(year)) => year.is_empty(),
            Some(_) => false,
        };
        if missing {
            log.insert(
                ACADEMIC_YEAR_FIELD.to_string(),
                Value::String(DEFAULT_ACADEMIC_YEAR.to_string()),
            );
            changed += 1;
        }
    }
    changed
}

/// Sets `value` to `0` when it is absent, null or not a number. Browsers
/// persist `NaN` as `null`.
fn normalize_values(document: &mut Value) -> usize {
    let mut changed = 0;
    for log in logs_mut(document) {
        if !log.get(VALUE_FIELD).is_some_and(Value::is_number) {
            log.insert(VALUE_FIELD.to_string(), Value::from(0));
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::migrate_document;
    use serde_json::json;

    #[test]
    fn backfills_missing_null_and_empty_years_only() {
        let mut doc = json!({
            "logs": [
                { "id": "a", "value": 1 },
                { "id": "b", "academicYear": null, "value": 1 },
                { "id": "c", "academicYear": "", "value": 1 },
                { "id": "d", "academicYear": "2022-23", "value": 1 }
            ]
        });

        assert_eq!(migrate_document(&mut doc), 3);
        assert_eq!(doc["logs"][0]["academicYear"], "2024-25");
        assert_eq!(doc["logs"][1]["academicYear"], "2024-25");
        assert_eq!(doc["logs"][2]["academicYear"], "2024-25");
        assert_eq!(doc["logs"][3]["academicYear"], "2022-23");
    }

    #[test]
    fn second_pass_is_a_noop() {
        let mut doc = json!({ "logs": [{ "id": "a" }] });
        migrate_document(&mut doc);
        let upgraded = doc.clone();

        assert_eq!(migrate_document(&mut doc), 0);
        assert_eq!(doc, upgraded);
    }

    #[test]
    fn null_and_non_numeric_values_become_zero() {
        let mut doc = json!({
            "logs": [
                { "id": "a", "academicYear": "2024-25", "value": null },
                { "id": "b", "academicYear": "2024-25" },
                { "id": "c", "academicYear": "2024-25", "value": "1" },
                { "id": "d", "academicYear": "2024-25", "value": -0.5 }
            ]
        });

        assert_eq!(migrate_document(&mut doc), 3);
        assert_eq!(doc["logs"][0]["value"], 0);
        assert_eq!(doc["logs"][1]["value"], 0);
        assert_eq!(doc["logs"][2]["value"], 0);
        assert_eq!(doc["logs"][3]["value"], -0.5);
    }

    #[test]
    fn documents_without_logs_are_left_alone() {
        let mut doc = json!({ "staff": [] });
        assert_eq!(migrate_document(&mut doc), 0);
        assert_eq!(doc, json!({ "staff": [] }));
    }
}
