//! Gemini `generateContent` client.
//!
//! # Invariants
//! - One blocking request per summary; no retry.
//! - The API key travels in a header, never in the URL or in logs.

use super::{SummaryClient, SummaryError};
use crate::config::AppConfig;
use log::info;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Model used for staff summaries.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text parts of the first candidate, joined. Empty when there is none.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

fn request_body(prompt: &str) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart { text: prompt }],
        }],
    }
}

impl From<reqwest::Error> for SummaryError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

/// Summary backend calling the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Builds a client for [`DEFAULT_MODEL`].
    ///
    /// # Errors
    /// Returns [`SummaryError::Transport`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, SummaryError> {
        let http = Client::builder()
            .user_agent(concat!("stafftrack/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Builds a client when `config` carries an API key; `Ok(None)` otherwise.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, SummaryError> {
        config.api_key.as_deref().map(Self::new).transpose()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE}/{}:generateContent", self.model)
    }
}

impl SummaryClient for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        let response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request_body(prompt))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummaryError::Rejected {
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            });
        }

        let body: GenerateResponse = response.json()?;
        info!(
            "event=summary_request module=summary status=ok model={} candidates={}",
            self.model,
            body.candidates.len()
        );
        Ok(body.text())
    }
}
