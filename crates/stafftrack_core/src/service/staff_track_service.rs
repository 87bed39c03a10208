//! Staff tracking use-case service.
//!
//! # Responsibility
//! - Hold the in-memory document for one session.
//! - Turn user input into commands, apply them, then persist the result.
//! - Expose read projections recomputed on demand.
//!
//! # Invariants
//! - One command runs to completion (apply, then save) before the next.
//! - The in-memory document is authoritative even when a save fails.
//! - Opening only loads; nothing is written until the first command.

use crate::engine::aggregate::{
    filtered_logs, group_by_year, log_rows, staff_totals, LogRow, StaffFilter, StaffTotal,
    YearGroups,
};
use crate::engine::mutation::{apply, Command};
use crate::id::generate_id;
use crate::model::academic_year::academic_year_for;
use crate::model::app_data::AppData;
use crate::model::event_log::EventLog;
use crate::model::event_type::{EventType, DEFAULT_EVENT_TYPE_COLOR};
use crate::model::staff::Staff;
use crate::report::{dashboard_report, year_report, ReportTable};
use crate::store::data_store::DataStore;
use crate::store::BlobStore;
use crate::summary::{generate_staff_summary, SummaryClient};
use chrono::{Local, NaiveDate};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input rejected before it reaches the mutation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// A required text field is blank.
    MissingField(&'static str),
    /// Impact values must be finite to survive JSON persistence.
    NonFiniteValue(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "`{field}` must not be empty"),
            Self::NonFiniteValue(field) => write!(f, "`{field}` must be a finite number"),
        }
    }
}

impl Error for ServiceError {}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Request for a new event type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewEventType {
    pub name: String,
    pub description: Option<String>,
    pub default_value: f64,
    /// Defaults to `#3b82f6`.
    pub color: Option<String>,
}

/// Request for a new log entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewEventLog {
    pub staff_id: String,
    pub event_type_id: String,
    /// Defaults to today's local date.
    pub date: Option<NaiveDate>,
    /// Defaults to the academic year of `date`.
    pub academic_year: Option<String>,
    /// Defaults to the event type's `default_value` (0 for unknown types).
    pub value: Option<f64>,
    pub notes: String,
}

/// Session facade over a `DataStore`.
pub struct StaffTrackService<S: BlobStore> {
    store: DataStore<S>,
    data: AppData,
}

impl<S: BlobStore> StaffTrackService<S> {
    /// Loads the document through `store`.
    pub fn open(store: DataStore<S>) -> Self {
        let data = store.load();
        Self { store, data }
    }

    /// Loads the document; `today` dates seed logs when seeding is needed.
    pub fn open_on(store: DataStore<S>, today: NaiveDate) -> Self {
        let data = store.load_on(today);
        Self { store, data }
    }

    pub fn data(&self) -> &AppData {
        &self.data
    }

    pub fn store(&self) -> &DataStore<S> {
        &self.store
    }

    /// Applies `command` and persists the new document.
    pub fn execute(&mut self, command: Command) -> &AppData {
        let name = command.name();
        let current = std::mem::take(&mut self.data);
        self.data = apply(current, command);
        let persisted = self.store.save(&self.data);
        info!(
            "event=command module=service status=ok command={} persisted={} staff={} event_types={} logs={}",
            name,
            persisted,
            self.data.staff.len(),
            self.data.event_types.len(),
            self.data.logs.len()
        );
        &self.data
    }

    pub fn add_staff(&mut self, name: &str) -> ServiceResult<Staff> {
        let staff = Staff::new(required("name", name)?);
        self.execute(Command::AddStaff(staff.clone()));
        Ok(staff)
    }

    pub fn rename_staff(&mut self, id: &str, name: &str) -> ServiceResult<()> {
        let name = required("name", name)?;
        self.execute(Command::RenameStaff {
            id: id.to_string(),
            name,
        });
        Ok(())
    }

    /// Removes the staff member and all of their logs.
    pub fn delete_staff(&mut self, id: &str) {
        self.execute(Command::DeleteStaff(id.to_string()));
    }

    pub fn add_event_type(&mut self, request: NewEventType) -> ServiceResult<EventType> {
        let name = required("name", &request.name)?;
        let default_value = finite("defaultValue", request.default_value)?;
        let color = request
            .color
            .map(|color| color.trim().to_string())
            .filter(|color| !color.is_empty())
            .unwrap_or_else(|| DEFAULT_EVENT_TYPE_COLOR.to_string());
        let kind = EventType::new(
            name,
            request.description.unwrap_or_default(),
            default_value,
            color,
        );
        self.execute(Command::AddEventType(kind.clone()));
        Ok(kind)
    }

    /// Removes the event type; its logs stay and show as `Unknown Type`.
    pub fn delete_event_type(&mut self, id: &str) {
        self.execute(Command::DeleteEventType(id.to_string()));
    }

    pub fn log_event(&mut self, request: NewEventLog) -> ServiceResult<EventLog> {
        let staff_id = required("staffId", &request.staff_id)?;
        let event_type_id = required("eventTypeId", &request.event_type_id)?;
        let date = request.date.unwrap_or_else(|| Local::now().date_naive());
        let academic_year = match request.academic_year {
            Some(year) => required("academicYear", &year)?,
            None => academic_year_for(date),
        };
        let value = match request.value {
            Some(value) => finite("value", value)?,
            None => self
                .data
                .find_event_type(&event_type_id)
                .map_or(0.0, |kind| kind.default_value),
        };

        let log = EventLog {
            id: generate_id(),
            staff_id,
            event_type_id,
            date: date.into(),
            academic_year,
            value,
            notes: request.notes,
        };
        self.execute(Command::AddLog(log.clone()));
        Ok(log)
    }

    pub fn delete_log(&mut self, id: &str) {
        self.execute(Command::DeleteLog(id.to_string()));
    }

    pub fn delete_logs_by_year(&mut self, year: &str) {
        self.execute(Command::DeleteLogsByYear(year.to_string()));
    }

    /// Empties the log collection; staff and event types are kept.
    pub fn clear_all_logs(&mut self) {
        self.execute(Command::ClearAllLogs);
    }

    pub fn staff_totals(&self, filter: &StaffFilter) -> Vec<StaffTotal<'_>> {
        staff_totals(&self.data, filter)
    }

    pub fn filtered_logs(&self, filter: &StaffFilter) -> Vec<&EventLog> {
        filtered_logs(&self.data, filter)
    }

    pub fn year_groups(&self) -> YearGroups<'_> {
        group_by_year(&self.data)
    }

    pub fn log_rows(&self, filter: &StaffFilter) -> Vec<LogRow<'_>> {
        log_rows(&self.data, filter)
    }

    pub fn dashboard_report(&self, filter: &StaffFilter, today: NaiveDate) -> ReportTable {
        dashboard_report(&self.data, filter, today)
    }

    pub fn year_report(&self, year: &str, today: NaiveDate) -> ReportTable {
        year_report(&self.data, year, today)
    }

    /// Summarizes one staff member; `None` when the id is unknown.
    pub fn staff_summary(
        &self,
        client: Option<&dyn SummaryClient>,
        staff_id: &str,
    ) -> Option<String> {
        let staff = self.data.find_staff(staff_id)?;
        Some(generate_staff_summary(client, &self.data, staff))
    }
}

fn required(field: &'static str, value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn finite(field: &'static str, value: f64) -> ServiceResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ServiceError::NonFiniteValue(field))
    }
}
