/// LLM Client — the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All text generation MUST go through `GenerationClient`.
///
/// Model: gemini-1.5-flash (hardcoded, along with the sampling and safety settings)
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod gemini;

pub use gemini::GeminiBackend;

/// The model used for every generation call.
pub const MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_MAX_RETRIES: u32 = 3;

const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.95;
const TOP_K: u32 = 40;
const MAX_OUTPUT_TOKENS: u32 = 2048;
const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        /// Upstream status string, e.g. `RESOURCE_EXHAUSTED`.
        reason: Option<String>,
        message: String,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No text in response")]
    EmptyResponse,
}

impl LlmError {
    /// True when the upstream rejected the call because the usage allowance is spent.
    pub fn is_quota(&self) -> bool {
        match self {
            LlmError::Api {
                status,
                reason,
                message,
            } => {
                *status == 429
                    || reason.as_deref() == Some("RESOURCE_EXHAUSTED")
                    || message.to_lowercase().contains("quota")
            }
            _ => false,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                top_k: TOP_K,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: SAFETY_THRESHOLD,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Extracts the text of the first candidate's first part.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Seams
// ────────────────────────────────────────────────────────────────────────────

/// One attempt at turning a prompt into text. No retries at this layer.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// The delay between retry attempts. Swapped out in tests so no real time passes.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Backoff before retry number `attempt` (1-based): 2s, 4s, 8s, ...
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(16))
}

// ────────────────────────────────────────────────────────────────────────────
// GenerationClient
// ────────────────────────────────────────────────────────────────────────────

/// The single generation client used by every handler.
/// Wraps a `CompletionBackend` with a bounded exponential-backoff retry loop.
#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn CompletionBackend>,
    sleeper: Arc<dyn Sleeper>,
    max_retries: u32,
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn CompletionBackend>, max_retries: u32) -> Self {
        Self {
            backend,
            sleeper: Arc::new(TokioSleeper),
            max_retries,
        }
    }

    #[cfg(test)]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Builds a client that talks to the live Gemini API.
    pub fn gemini(api_key: String, max_retries: u32) -> Result<Self, LlmError> {
        let backend = GeminiBackend::new(api_key)?;
        Ok(Self::new(Arc::new(backend), max_retries))
    }

    /// Sends the prompt, retrying every failure up to `max_retries` times.
    /// The last error is returned once the budget is spent.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let mut failures = 0;

        loop {
            match self.backend.complete(prompt).await {
                Ok(text) => {
                    debug!(
                        "Generation succeeded after {} retries ({} chars)",
                        failures,
                        text.len()
                    );
                    return Ok(text);
                }
                Err(e) => {
                    failures += 1;
                    if failures > self.max_retries {
                        warn!("Generation failed after {} attempts: {}", failures, e);
                        return Err(e);
                    }

                    let delay = backoff_delay(failures);
                    warn!(
                        "Generation attempt {} failed: {}; retrying after {}ms...",
                        failures,
                        e,
                        delay.as_millis()
                    );
                    self.sleeper.sleep(delay).await;
                }
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Test doubles
// ────────────────────────────────────────────────────────────────────────────
