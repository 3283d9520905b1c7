//! Live `CompletionBackend` over the Gemini `generateContent` REST endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{CompletionBackend, GenerateContentRequest, GenerateContentResponse, LlmError, MODEL};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
    status: Option<String>,
}

pub struct GeminiBackend {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GeminiBackend {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key,
            endpoint: format!("{GEMINI_API_BASE}/models/{MODEL}:generateContent"),
        })
    }
}

#[async_trait]
impl CompletionBackend for GeminiBackend {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest::new(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        let body: GenerateContentResponse = serde_json::from_str(&response.text().await?)?;

        if let Some(usage) = &body.usage_metadata {
            debug!(
                "Gemini call: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        match body.text() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            _ => Err(LlmError::EmptyResponse),
        }
    }
}

/// Builds an `LlmError::Api` from a non-2xx response, keeping the upstream
/// status string when the body is the usual `{"error": {...}}` envelope.
fn api_error(status: u16, body: String) -> LlmError {
    match serde_json::from_str::<GeminiError>(&body) {
        Ok(parsed) => LlmError::Api {
            status,
            reason: parsed.error.status,
            message: parsed.error.message,
        },
        Err(_) => LlmError::Api {
            status,
            reason: None,
            message: body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_parses_resource_exhausted_envelope() {
        let body = r#"{
            "error": {
                "code": 429,
                "message": "Resource has been exhausted (e.g. check quota).",
                "status": "RESOURCE_EXHAUSTED"
            }
        }"#;
        let err = api_error(429, body.to_string());

        assert!(err.is_quota());
        match err {
            LlmError::Api { status, reason, .. } => {
                assert_eq!(status, 429);
                assert_eq!(reason.as_deref(), Some("RESOURCE_EXHAUSTED"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_keeps_raw_body_when_not_json() {
        let err = api_error(502, "Bad Gateway".to_string());
        assert!(!err.is_quota());
        assert_eq!(err.to_string(), "API error (status 502): Bad Gateway");
    }

    #[test]
    fn test_endpoint_targets_pinned_model() {
        let backend = GeminiBackend::new("key".to_string()).unwrap();
        assert!(backend.endpoint.ends_with("/models/gemini-1.5-flash:generateContent"));
    }
}
