//! Staff activity summaries from a generative-text service.
//!
//! # Responsibility
//! - Enrich one staff member's logs with event type names and build the prompt.
//! - Call the configured `SummaryClient` once, with no retry.
//! - Provide the Gemini HTTP client used when `API_KEY` is configured.
//!
//! # Invariants
//! - Never returns an error: missing credentials, service failure and empty
//!   output each map to a fixed message.
//! - Prompt data carries no ids, only dates, type names, impacts and notes.

use crate::model::app_data::{AppData, UNKNOWN};
use crate::model::event_log::EventLog;
use crate::model::staff::Staff;
use log::{error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod gemini;

pub use gemini::GeminiClient;

pub const MISSING_CREDENTIALS_MESSAGE: &str =
    "API Key not found. Please ensure the API_KEY environment variable is set.";
pub const SERVICE_FAILURE_MESSAGE: &str = "Failed to generate report due to an API error.";
pub const EMPTY_SUMMARY_MESSAGE: &str = "No analysis generated.";

/// Failure reported by a summary backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    Transport(String),
    Rejected { status: u16, message: String },
}

impl Display for SummaryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "summary transport error: {message}"),
            Self::Rejected { status, message } => {
                write!(f, "summary request rejected ({status}): {message}")
            }
        }
    }
}

impl Error for SummaryError {}

/// Generative-text backend.
pub trait SummaryClient {
    fn generate(&self, prompt: &str) -> Result<String, SummaryError>;
}

/// One log as presented to the summary service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedLog {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub impact: f64,
    pub notes: String,
}

/// Resolves event type names for `logs`; dangling types become `Unknown`.
pub fn enrich_logs(data: &AppData, logs: &[&EventLog]) -> Vec<EnrichedLog> {
    logs.iter()
        .map(|log| EnrichedLog {
            date: log.date.to_string(),
            kind: data
                .find_event_type(&log.event_type_id)
                .map(|kind| kind.name.clone())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            impact: log.value,
            notes: log.notes.clone(),
        })
        .collect()
}

/// Builds the HR-assistant prompt for `staff`.
pub fn build_summary_prompt(staff: &Staff, logs: &[EnrichedLog]) -> String {
    let total_score: f64 = logs.iter().map(|log| log.impact).sum();
    let events = serde_json::to_string_pretty(logs).unwrap_or_else(|_| "[]".to_string());

    format!(
        "You are a professional HR assistant. Please analyze the following event log for a staff member named {name}.

Context:
- Positive values represent \"usage\" or \"burden\" (e.g., Sick Leave, Lateness).
- Negative values represent \"contribution\" or \"credit\" (e.g., Covering classes).
- A lower total score suggests higher contribution.
- A higher total score suggests higher absence or usage.

Data:
Total Score: {total_score}
Events:
{events}

Please provide a concise, professional summary of their recent activity. Highlight patterns in their attendance or contributions.
Be constructive. If the score is negative, praise their extra effort. If high positive, suggest support.",
        name = staff.name,
    )
}

/// Summarizes `staff`'s logs. `client` is `None` when no credentials are
/// configured.
pub fn generate_staff_summary(
    client: Option<&dyn SummaryClient>,
    data: &AppData,
    staff: &Staff,
) -> String {
    let Some(client) = client else {
        info!("event=staff_summary module=summary status=skipped reason=no_credentials");
        return MISSING_CREDENTIALS_MESSAGE.to_string();
    };

    let logs: Vec<&EventLog> = data
        .logs
        .iter()
        .filter(|log| log.staff_id == staff.id)
        .collect();
    let prompt = build_summary_prompt(staff, &enrich_logs(data, &logs));

    match client.generate(&prompt) {
        Ok(text) if text.trim().is_empty() => EMPTY_SUMMARY_MESSAGE.to_string(),
        Ok(text) => {
            info!(
                "event=staff_summary module=summary status=ok logs={}",
                logs.len()
            );
            text
        }
        Err(err) => {
            error!(
                "event=staff_summary module=summary status=error error_code=service_failed error={err}"
            );
            SERVICE_FAILURE_MESSAGE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        build_summary_prompt, enrich_logs, generate_staff_summary, SummaryClient, SummaryError,
        EMPTY_SUMMARY_MESSAGE, MISSING_CREDENTIALS_MESSAGE, SERVICE_FAILURE_MESSAGE,
    };
    use crate::model::app_data::AppData;
    use crate::store::seed::seed_document;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    struct CannedClient {
        reply: Result<String, SummaryError>,
        prompts: RefCell<Vec<String>>,
    }

    impl CannedClient {
        fn new(reply: Result<String, SummaryError>) -> Self {
            Self {
                reply,
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl SummaryClient for CannedClient {
        fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.reply.clone()
        }
    }

    fn seeded() -> AppData {
        seed_document(NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date"))
    }

    #[test]
    fn missing_client_returns_credentials_message() {
        let data = seeded();
        let summary = generate_staff_summary(None, &data, &data.staff[0]);
        assert_eq!(summary, MISSING_CREDENTIALS_MESSAGE);
    }

    #[test]
    fn service_failure_returns_fixed_message() {
        let data = seeded();
        let client = CannedClient::new(Err(SummaryError::Transport("timeout".to_string())));
        let summary = generate_staff_summary(Some(&client), &data, &data.staff[0]);
        assert_eq!(summary, SERVICE_FAILURE_MESSAGE);
    }

    #[test]
    fn blank_reply_returns_empty_message() {
        let data = seeded();
        let client = CannedClient::new(Ok("  ".to_string()));
        let summary = generate_staff_summary(Some(&client), &data, &data.staff[0]);
        assert_eq!(summary, EMPTY_SUMMARY_MESSAGE);
    }

    #[test]
    fn prompt_contains_only_that_staff_members_logs() {
        let data = seeded();
        let client = CannedClient::new(Ok("Great work.".to_string()));
        let summary = generate_staff_summary(Some(&client), &data, &data.staff[0]);
        assert_eq!(summary, "Great work.");

        let prompts = client.prompts.borrow();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Alice Johnson"));
        assert!(prompts[0].contains("Covered for Dave"));
        assert!(prompts[0].contains("Total Score: -1"));
        assert!(!prompts[0].contains("Flu"));
    }

    #[test]
    fn dangling_event_type_enriches_as_unknown() {
        let mut data = seeded();
        data.event_types.clear();
        let logs: Vec<_> = data.logs.iter().collect();
        let enriched = enrich_logs(&data, &logs);
        assert!(enriched.iter().all(|log| log.kind == "Unknown"));

        let prompt = build_summary_prompt(&data.staff[1], &enriched);
        assert!(prompt.contains("\"type\": \"Unknown\""));
    }
}
