use std::env;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::prompt::build_prompt;
use crate::error::LeadGenError;
use crate::profit::model::ProfitResult;
use crate::LeadGenResult;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "GEMINI_MODEL";
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Shown instead of a report once every attempt has failed.
pub const UNAVAILABLE_MESSAGE: &str =
    "The analysis engine did not respond in time. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl NarrativeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn from_env() -> LeadGenResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LeadGenResult<Self> {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let api_key = read(API_KEY_VAR).ok_or_else(|| LeadGenError::MissingApiKey(API_KEY_VAR.into()))?;
        Ok(Self {
            api_key,
            model: read(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: read(BASE_URL_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

// ---------------------------------------------------------------------------
// API types
// ---------------------------------------------------------------------------

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

#[derive(Debug, Deserialize)]
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

fn first_text(response: GenerateResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Anything that turns a prompt into text.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> LeadGenResult<String>;
}

pub struct GeminiClient {
    http: Client,
    config: NarrativeConfig,
}

impl GeminiClient {
    pub fn new(config: NarrativeConfig) -> LeadGenResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> LeadGenResult<String> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self.http.post(self.config.endpoint()).json(&request).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LeadGenError::Http(format!("HTTP {status}: {body}")));
        }

        let body: GenerateResponse = response
            .json()
            .map_err(|e| LeadGenError::MalformedResponse(e.to_string()))?;
        first_text(body).ok_or_else(|| {
            LeadGenError::MalformedResponse("no text in candidates[0].content.parts[0]".into())
        })
    }
}

// ---------------------------------------------------------------------------
// Retry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Wait before attempt `attempt` (1-based). The first attempt never waits.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(attempt - 2);
        self.initial_delay.saturating_mul(factor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NarrativeSummary {
    Generated { text: String, attempts: u32 },
    Unavailable { message: String, attempts: u32 },
}

impl NarrativeSummary {
    pub fn text(&self) -> &str {
        match self {
            NarrativeSummary::Generated { text, .. } => text,
            NarrativeSummary::Unavailable { message, .. } => message,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            NarrativeSummary::Generated { attempts, .. }
            | NarrativeSummary::Unavailable { attempts, .. } => *attempts,
        }
    }
}

/// Ask `generator` for a diagnostic report on `result`, retrying with
/// doubling back-off. Never fails: exhaustion yields `Unavailable`.
pub fn summarize(
    generator: &dyn TextGenerator,
    result: &ProfitResult,
    policy: &RetryPolicy,
) -> NarrativeSummary {
    let prompt = build_prompt(result);
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let delay = policy.delay_before(attempt);
        if !delay.is_zero() {
            debug!(attempt, delay_ms = delay.as_millis() as u64, "Retrying text generation");
            thread::sleep(delay);
        }

        match generator.generate(&prompt) {
            Ok(text) => {
                info!(attempt, chars = text.len(), "Narrative generated");
                return NarrativeSummary::Generated { text, attempts: attempt };
            }
            Err(e) => {
                warn!(attempt, max_attempts, error = %e, "Text generation attempt failed");
            }
        }
    }

    NarrativeSummary::Unavailable {
        message: UNAVAILABLE_MESSAGE.to_string(),
        attempts: max_attempts,
    }
}
