//! Command application over the aggregate document.
//!
//! # Invariants
//! - Deleting a staff member cascades to every log with that `staff_id`.
//! - Deleting an event type does NOT cascade: its logs stay and resolve to
//!   `Unknown Type` on read.
//! - Deleting an id that does not exist changes nothing.
//! - Adding an entity whose id already exists in its collection changes
//!   nothing, so ids stay unique per collection.
//! - New logs are prepended; staff and event types are appended.
//! - Deleting by year removes exactly the logs grouped under that year.

use crate::engine::aggregate::year_key;
use crate::model::app_data::AppData;
use crate::model::event_log::{EventLog, EventLogId};
use crate::model::event_type::{EventType, EventTypeId};
use crate::model::staff::{Staff, StaffId};

/// One mutation request against the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddStaff(Staff),
    /// Replaces the display name; identity and logs are untouched.
    RenameStaff {
        id: StaffId,
        name: String,
    },
    DeleteStaff(StaffId),
    AddEventType(EventType),
    DeleteEventType(EventTypeId),
    AddLog(EventLog),
    DeleteLog(EventLogId),
    DeleteLogsByYear(String),
    ClearAllLogs,
}

impl Command {
    /// Stable name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddStaff(_) => "add_staff",
            Self::RenameStaff { .. } => "rename_staff",
            Self::DeleteStaff(_) => "delete_staff",
            Self::AddEventType(_) => "add_event_type",
            Self::DeleteEventType(_) => "delete_event_type",
            Self::AddLog(_) => "add_log",
            Self::DeleteLog(_) => "delete_log",
            Self::DeleteLogsByYear(_) => "delete_logs_by_year",
            Self::ClearAllLogs => "clear_all_logs",
        }
    }
}

/// Applies `command` and returns the resulting document.
pub fn apply(data: AppData, command: Command) -> AppData {
    match command {
        Command::AddStaff(staff) => add_staff(data, staff),
        Command::RenameStaff { id, name } => rename_staff(data, &id, name),
        Command::DeleteStaff(id) => delete_staff(data, &id),
        Command::AddEventType(kind) => add_event_type(data, kind),
        Command::DeleteEventType(id) => delete_event_type(data, &id),
        Command::AddLog(log) => add_log(data, log),
        Command::DeleteLog(id) => delete_log(data, &id),
        Command::DeleteLogsByYear(year) => delete_logs_by_year(data, &year),
        Command::ClearAllLogs => clear_all_logs(data),
    }
}

pub fn add_staff(mut data: AppData, staff: Staff) -> AppData {
    if data.find_staff(&staff.id).is_none() {
        data.staff.push(staff);
    }
    data
}

pub fn rename_staff(mut data: AppData, id: &str, name: String) -> AppData {
    if let Some(staff) = data.staff.iter_mut().find(|staff| staff.id == id) {
        staff.name = name;
    }
    data
}

/// Removes the staff member and every log recorded against them.
pub fn delete_staff(mut data: AppData, id: &str) -> AppData {
    data.staff.retain(|staff| staff.id != id);
    data.logs.retain(|log| log.staff_id != id);
    data
}

pub fn add_event_type(mut data: AppData, kind: EventType) -> AppData {
    if data.find_event_type(&kind.id).is_none() {
        data.event_types.push(kind);
    }
    data
}

/// Removes the event type only; its logs are kept as dangling references.
pub fn delete_event_type(mut data: AppData, id: &str) -> AppData {
    data.event_types.retain(|kind| kind.id != id);
    data
}

/// Prepends the log so the collection stays most-recent-first.
pub fn add_log(mut data: AppData, log: EventLog) -> AppData {
    if data.logs.iter().all(|existing| existing.id != log.id) {
        data.logs.insert(0, log);
    }
    data
}

pub fn delete_log(mut data: AppData, id: &str) -> AppData {
    data.logs.retain(|log| log.id != id);
    data
}

/// Removes every log in the `year` group; `Unknown` covers empty years.
pub fn delete_logs_by_year(mut data: AppData, year: &str) -> AppData {
    data.logs.retain(|log| year_key(log) != year);
    data
}

pub fn clear_all_logs(mut data: AppData) -> AppData {
    data.logs.clear();
    data
}

#[cfg(test)]
mod tests {
    use super::{apply, Command};
    use crate::model::app_data::AppData;
    use crate::model::staff::Staff;

    #[test]
    fn duplicate_staff_id_is_ignored() {
        let data = apply(
            AppData::default(),
            Command::AddStaff(Staff::with_id("s1", "Alice")),
        );
        let data = apply(data, Command::AddStaff(Staff::with_id("s1", "Impostor")));
        assert_eq!(data.staff.len(), 1);
        assert_eq!(data.staff[0].name, "Alice");
    }

    #[test]
    fn rename_keeps_identity() {
        let data = apply(
            AppData::default(),
            Command::AddStaff(Staff::with_id("s1", "Alice")),
        );
        let data = apply(
            data,
            Command::RenameStaff {
                id: "s1".to_string(),
                name: "Alice Jones".to_string(),
            },
        );
        assert_eq!(data.staff, vec![Staff::with_id("s1", "Alice Jones")]);
    }

    #[test]
    fn rename_unknown_id_is_noop() {
        let before = apply(
            AppData::default(),
            Command::AddStaff(Staff::with_id("s1", "Alice")),
        );
        let after = apply(
            before.clone(),
            Command::RenameStaff {
                id: "missing".to_string(),
                name: "Nobody".to_string(),
            },
        );
        assert_eq!(after, before);
    }
}
