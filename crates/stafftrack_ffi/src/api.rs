//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Flatten core types into plain envelopes with string ids.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Calls are serialized process-wide: one command runs to completion
//!   (load, apply, save) before the next starts.
//! - Network calls never run while the session lock is held.

use chrono::NaiveDate;
use log::error;
use stafftrack_core::db::open_db;
use stafftrack_core::report::format_impact;
use stafftrack_core::summary::SERVICE_FAILURE_MESSAGE;
use stafftrack_core::{
    academic_year_options, core_version as core_version_inner, generate_staff_summary,
    init_logging as init_logging_inner, ping as ping_inner, AppConfig, DataStore, GeminiClient,
    NewEventLog, NewEventType, SqliteBlobStore, StaffFilter, StaffTrackService, SummaryClient,
};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Id of the created entity, when the action creates one.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn created(message: impl Into<String>, id: String) -> Self {
        Self {
            ok: true,
            id: Some(id),
            message: message.into(),
        }
    }

    fn done(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            id: None,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffItem {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventTypeItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub default_value: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaffTotalItem {
    pub staff_id: String,
    pub name: String,
    pub total_score: f64,
    pub log_count: u32,
}

/// One dashboard table row with references already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRowItem {
    pub id: String,
    pub date: String,
    /// `-` when the log has no academic year.
    pub academic_year: String,
    pub staff_name: String,
    pub event_type_name: String,
    /// `None` when the event type was deleted.
    pub color: Option<String>,
    pub value: f64,
    /// Signed display form, e.g. `+1`.
    pub impact_label: String,
    pub notes: String,
}

/// Everything the dashboard view renders for one filter selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub staff: Vec<StaffItem>,
    pub event_types: Vec<EventTypeItem>,
    pub totals: Vec<StaffTotalItem>,
    pub rows: Vec<LogRowItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSummaryItem {
    pub year: String,
    pub record_count: u32,
}

/// Loads the dashboard for `staff_filter` (`all` or a staff id).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; on failure returns empty collections and the error in
///   `message`.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_snapshot(staff_filter: String) -> DashboardSnapshot {
    let filter = StaffFilter::from_selection(&staff_filter);
    let snapshot = with_service(|service| {
        let data = service.data();
        let rows = service
            .log_rows(&filter)
            .into_iter()
            .map(|row| LogRowItem {
                id: row.log.id.clone(),
                date: row.log.date.to_string(),
                academic_year: if row.log.academic_year.is_empty() {
                    "-".to_string()
                } else {
                    row.log.academic_year.clone()
                },
                staff_name: row.staff_name.to_string(),
                event_type_name: row.event_type_name.to_string(),
                color: row.color.map(str::to_string),
                value: row.log.value,
                impact_label: format_impact(row.log.value),
                notes: row.log.notes.clone(),
            })
            .collect::<Vec<_>>();
        DashboardSnapshot {
            staff: data
                .staff
                .iter()
                .map(|staff| StaffItem {
                    id: staff.id.clone(),
                    name: staff.name.clone(),
                })
                .collect(),
            event_types: data
                .event_types
                .iter()
                .map(|kind| EventTypeItem {
                    id: kind.id.clone(),
                    name: kind.name.clone(),
                    description: kind.description.clone(),
                    default_value: kind.default_value,
                    color: kind.color.clone(),
                })
                .collect(),
            totals: service
                .staff_totals(&filter)
                .into_iter()
                .map(|total| StaffTotalItem {
                    staff_id: total.staff.id.clone(),
                    name: total.staff.name.clone(),
                    total_score: total.total_score,
                    log_count: u32::try_from(total.log_count).unwrap_or(u32::MAX),
                })
                .collect(),
            message: format!("{} records found", rows.len()),
            rows,
        }
    });

    snapshot.unwrap_or_else(|err| DashboardSnapshot {
        staff: Vec::new(),
        event_types: Vec::new(),
        totals: Vec::new(),
        rows: Vec::new(),
        message: format!("dashboard_snapshot failed: {err}"),
    })
}

/// Adds a staff member.
///
/// # FFI contract
/// - Returns the created staff id on success.
/// - Blank names are rejected with `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn add_staff(name: String) -> ActionResponse {
    respond("add_staff", |service| {
        service
            .add_staff(&name)
            .map(|staff| ActionResponse::created("Staff member added.", staff.id))
    })
}

/// Deletes a staff member together with all of their logs.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_staff(id: String) -> ActionResponse {
    respond("delete_staff", |service| {
        service.delete_staff(&id);
        Ok(ActionResponse::done("Staff member deleted."))
    })
}

/// Adds an event type. Empty `description`/`color` use defaults.
#[flutter_rust_bridge::frb(sync)]
pub fn add_event_type(
    name: String,
    description: String,
    default_value: f64,
    color: String,
) -> ActionResponse {
    respond("add_event_type", |service| {
        service
            .add_event_type(NewEventType {
                name,
                description: Some(description),
                default_value,
                color: Some(color),
            })
            .map(|kind| ActionResponse::created("Event type added.", kind.id))
    })
}

/// Deletes an event type; its logs remain and show as `Unknown Type`.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_event_type(id: String) -> ActionResponse {
    respond("delete_event_type", |service| {
        service.delete_event_type(&id);
        Ok(ActionResponse::done("Event type deleted."))
    })
}

/// Records one event.
///
/// Input semantics:
/// - `date`: `YYYY-MM-DD`; `None` means today.
/// - `academic_year`: `None` derives the year from `date`.
/// - `value`: `None` copies the event type's default value.
#[flutter_rust_bridge::frb(sync)]
pub fn log_event(
    staff_id: String,
    event_type_id: String,
    date: Option<String>,
    academic_year: Option<String>,
    value: Option<f64>,
    notes: String,
) -> ActionResponse {
    let date = match date.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
        None => None,
        Some(raw) => match raw.parse::<NaiveDate>() {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                return ActionResponse::failure(format!("log_event failed: invalid date: {err}"))
            }
        },
    };

    respond("log_event", |service| {
        service
            .log_event(NewEventLog {
                staff_id,
                event_type_id,
                date,
                academic_year,
                value,
                notes,
            })
            .map(|log| ActionResponse::created("Event logged successfully!", log.id))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn delete_log(id: String) -> ActionResponse {
    respond("delete_log", |service| {
        service.delete_log(&id);
        Ok(ActionResponse::done("Log deleted."))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn delete_logs_by_year(year: String) -> ActionResponse {
    respond("delete_logs_by_year", |service| {
        service.delete_logs_by_year(&year);
        Ok(ActionResponse::done(format!("Logs for {year} deleted.")))
    })
}

/// Deletes every log; staff profiles and event types remain.
#[flutter_rust_bridge::frb(sync)]
pub fn clear_all_logs() -> ActionResponse {
    respond("clear_all_logs", |service| {
        service.clear_all_logs();
        Ok(ActionResponse::done("All event logs cleared."))
    })
}

/// Academic years with record counts, newest first.
#[flutter_rust_bridge::frb(sync)]
pub fn year_summaries() -> Vec<YearSummaryItem> {
    with_service(|service| {
        service
            .year_groups()
            .iter()
            .map(|(year, logs)| YearSummaryItem {
                year: year.to_string(),
                record_count: u32::try_from(logs.len()).unwrap_or(u32::MAX),
            })
            .collect()
    })
    .unwrap_or_default()
}

/// Academic years offered by the log form for `current_year`.
#[flutter_rust_bridge::frb(sync)]
pub fn academic_year_choices(current_year: i32) -> Vec<String> {
    academic_year_options(current_year)
}

/// AI-written activity summary for one staff member.
///
/// # FFI contract
/// - Async call: performs one network request when `API_KEY` is set.
/// - Never panics; missing credentials and service failures come back as
///   fixed messages.
pub fn staff_summary(staff_id: String) -> String {
    match GeminiClient::from_config(&AppConfig::from_env()) {
        Ok(client) => summarize_with(
            client.as_ref().map(|client| client as &dyn SummaryClient),
            &staff_id,
        ),
        Err(err) => {
            error!("event=ffi_summary module=ffi status=error error={err}");
            SERVICE_FAILURE_MESSAGE.to_string()
        }
    }
}

fn summarize_with(client: Option<&dyn SummaryClient>, staff_id: &str) -> String {
    let data = match with_service(|service| service.data().clone()) {
        Ok(data) => data,
        Err(err) => return format!("staff_summary failed: {err}"),
    };
    match data.find_staff(staff_id) {
        Some(staff) => generate_staff_summary(client, &data, staff),
        None => format!("staff_summary failed: unknown staff id `{staff_id}`"),
    }
}

type Service<'conn> = StaffTrackService<SqliteBlobStore<'conn>>;

fn respond(
    action: &str,
    f: impl FnOnce(&mut Service<'_>) -> stafftrack_core::ServiceResult<ActionResponse>,
) -> ActionResponse {
    match with_service(f) {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => ActionResponse::failure(format!("{action} failed: {err}")),
        Err(err) => ActionResponse::failure(format!("{action} failed: {err}")),
    }
}

fn with_service<T>(f: impl FnOnce(&mut Service<'_>) -> T) -> Result<T, String> {
    let _session = SESSION_LOCK
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        error!("event=ffi_open module=ffi status=error error={err}");
        format!("DB open failed: {err}")
    })?;
    let mut service = StaffTrackService::open(DataStore::new(SqliteBlobStore::new(&conn)));
    Ok(f(&mut service))
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| AppConfig::from_env().db_path)
        .clone()
}

#[cfg(test)]
mod tests {
    use super::{
        academic_year_choices, add_event_type, add_staff, core_version, dashboard_snapshot,
        delete_event_type, delete_logs_by_year, delete_staff, init_logging, log_event, ping,
        summarize_with, year_summaries, DB_PATH,
    };
    use stafftrack_core::summary::MISSING_CREDENTIALS_MESSAGE;
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tempfile::TempDir;

    static TEST_DB_DIR: OnceLock<TempDir> = OnceLock::new();

    /// Points every call in this test binary at one private database.
    fn use_test_db() {
        let dir = TEST_DB_DIR.get_or_init(|| tempfile::tempdir().expect("temp dir"));
        let path = DB_PATH.get_or_init(|| dir.path().join("stafftrack.sqlite3"));
        assert!(path.starts_with(dir.path()), "db path resolved before test setup");
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn add_staff_rejects_blank_name() {
        use_test_db();
        let response = add_staff("   ".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("name"));
    }

    #[test]
    fn staff_deletion_cascades_to_logs() {
        use_test_db();
        let token = unique_token("cascade");
        let staff = add_staff(format!("staff {token}"));
        assert!(staff.ok, "{}", staff.message);
        let staff_id = staff.id.expect("created staff id");

        let logged = log_event(
            staff_id.clone(),
            "1".to_string(),
            Some("2024-10-01".to_string()),
            Some(token.clone()),
            Some(-1.0),
            String::new(),
        );
        assert!(logged.ok, "{}", logged.message);
        let log_id = logged.id.expect("created log id");

        let filtered = dashboard_snapshot(staff_id.clone());
        assert_eq!(filtered.rows.len(), 1);
        assert_eq!(filtered.rows[0].id, log_id);
        assert_eq!(filtered.rows[0].impact_label, "-1");
        assert_eq!(filtered.totals.len(), 1);
        assert_eq!(filtered.totals[0].log_count, 1);

        assert!(delete_staff(staff_id.clone()).ok);
        let after = dashboard_snapshot("all".to_string());
        assert!(after.rows.iter().all(|row| row.id != log_id));
        assert!(after.staff.iter().all(|staff| staff.id != staff_id));
    }

    #[test]
    fn event_type_deletion_keeps_logs() {
        use_test_db();
        let token = unique_token("type");
        let staff_id = add_staff(format!("staff {token}")).id.expect("staff id");
        let type_id = add_event_type(format!("type {token}"), String::new(), 2.0, String::new())
            .id
            .expect("type id");

        let logged = log_event(
            staff_id.clone(),
            type_id.clone(),
            None,
            Some(token.clone()),
            None,
            "note".to_string(),
        );
        assert!(logged.ok, "{}", logged.message);

        assert!(delete_event_type(type_id).ok);
        let snapshot = dashboard_snapshot(staff_id.clone());
        assert_eq!(snapshot.rows.len(), 1);
        assert_eq!(snapshot.rows[0].event_type_name, "Unknown Type");
        assert_eq!(snapshot.rows[0].color, None);
        assert_eq!(snapshot.rows[0].value, 2.0);

        assert!(year_summaries()
            .iter()
            .any(|item| item.year == token && item.record_count == 1));
        assert!(delete_logs_by_year(token.clone()).ok);
        assert!(year_summaries().iter().all(|item| item.year != token));

        delete_staff(staff_id);
    }

    #[test]
    fn summary_without_credentials_or_staff_returns_message() {
        use_test_db();
        let staff_id = add_staff("Summary Subject".to_string())
            .id
            .expect("staff id");

        assert_eq!(summarize_with(None, &staff_id), MISSING_CREDENTIALS_MESSAGE);
        assert!(summarize_with(None, "no-such-staff").contains("unknown staff id"));

        delete_staff(staff_id);
    }

    #[test]
    fn log_event_rejects_malformed_date() {
        use_test_db();
        let response = log_event(
            "1".to_string(),
            "1".to_string(),
            Some("01/10/2024".to_string()),
            None,
            None,
            String::new(),
        );
        assert!(!response.ok);
        assert!(response.message.contains("invalid date"));
    }

    #[test]
    fn academic_year_choices_span_four_years() {
        assert_eq!(academic_year_choices(2025).len(), 4);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
