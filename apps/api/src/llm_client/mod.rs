//! LLM Client: the single point of entry for all Gemini API calls in Genovance.
//!
//! ARCHITECTURAL RULE: No other module may call the Generative Language API directly.
//! All LLM interactions MUST go through this module.
//!
//! Model: gemini-2.5-flash (fixed, not configurable)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod failover;

pub use failover::{Credential, GenerationResult, ResilientGenerator};

/// The model used for all LLM calls in Genovance.
pub const MODEL: &str = "gemini-2.5-flash";
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 120;
const BACKOFF_BASE: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Anything that can turn a prompt into text using a given credential.
///
/// The credential is a parameter of every call; implementors hold no
/// "active key" of their own.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    pub usage: Option<UsageMetadata>,
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
pub struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    pub prompt_tokens: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    pub output_tokens: u32,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Wraps the Gemini `generateContent` REST API with retry on transient failures.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    backoff_base: Duration,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            base_url: base_url.into(),
            backoff_base: BACKOFF_BASE,
        })
    }

    #[cfg(test)]
    fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{MODEL}:generateContent",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Makes a raw call to the Gemini API, returning the full response object.
    /// Retries on transport errors and 5xx with exponential backoff.
    /// A 429 is returned straight away so the caller can switch credentials.
    pub async fn call(
        &self,
        prompt: &str,
        api_key: &str,
    ) -> Result<GenerateContentResponse, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };
        let url = self.endpoint();

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = self.backoff_base * (1 << (attempt - 1));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: parse_error_message(body),
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: parse_error_message(body),
                });
            }

            let llm_response: GenerateContentResponse = response.json().await?;

            if let Some(usage) = &llm_response.usage {
                debug!(
                    "LLM call succeeded: input_tokens={}, output_tokens={}",
                    usage.prompt_tokens, usage.output_tokens
                );
            }

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::EmptyContent))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, api_key).await?;
        response.text().ok_or(LlmError::EmptyContent)
    }
}

/// Pulls `error.message` out of a Gemini error body, falling back to the raw body.
fn parse_error_message(body: String) -> String {
    serde_json::from_str::<GeminiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::Router;

    use crate::llm_client::failover::is_quota_error;

    const QUOTA_BODY: &str = r#"{
        "error": {
            "code": 429,
            "message": "Resource has been exhausted (e.g. check quota).",
            "status": "RESOURCE_EXHAUSTED"
        }
    }"#;

    /// What the local stand-in for the Gemini endpoint saw.
    #[derive(Default)]
    struct SeenRequests {
        hits: AtomicUsize,
        last_key: Mutex<Option<String>>,
        last_path: Mutex<Option<String>>,
    }

    impl SeenRequests {
        fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }
    }

    /// Serves `status` + `body` for every request on a local port.
    async fn local_gemini(status: u16, body: &'static str) -> (GeminiClient, Arc<SeenRequests>) {
        let seen = Arc::new(SeenRequests::default());
        let recorder = seen.clone();
        let app = Router::new().fallback(move |headers: HeaderMap, uri: Uri| {
            let recorder = recorder.clone();
            async move {
                recorder.hits.fetch_add(1, Ordering::SeqCst);
                *recorder.last_key.lock().unwrap() = headers
                    .get("x-goog-api-key")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                *recorder.last_path.lock().unwrap() = Some(uri.path().to_string());
                (StatusCode::from_u16(status).unwrap(), body)
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = GeminiClient::new(format!("http://{addr}"))
            .unwrap()
            .with_backoff_base(Duration::from_millis(1));
        (client, seen)
    }

    #[tokio::test]
    async fn test_success_returns_text_and_sends_key_header() {
        let (client, seen) = local_gemini(
            200,
            r#"{"candidates": [{"content": {"parts": [{"text": "1. Hook"}]}}]}"#,
        )
        .await;

        let text = client.generate("pitch it", "key-123").await.unwrap();

        assert_eq!(text, "1. Hook");
        assert_eq!(seen.hits(), 1);
        assert_eq!(seen.last_key.lock().unwrap().as_deref(), Some("key-123"));
        assert_eq!(
            seen.last_path.lock().unwrap().as_deref(),
            Some("/v1beta/models/gemini-2.5-flash:generateContent")
        );
    }

    #[tokio::test]
    async fn test_429_is_returned_without_retry() {
        let (client, seen) = local_gemini(429, QUOTA_BODY).await;

        let err = client.generate("prompt", "key").await.unwrap_err();

        assert_eq!(seen.hits(), 1);
        assert!(matches!(
            &err,
            LlmError::Api { status: 429, message }
                if message == "Resource has been exhausted (e.g. check quota)."
        ));
        assert!(is_quota_error(&err));
    }

    #[tokio::test]
    async fn test_server_error_retried_up_to_max_attempts() {
        let (client, seen) = local_gemini(
            503,
            r#"{"error": {"code": 503, "message": "The model is overloaded."}}"#,
        )
        .await;

        let err = client.generate("prompt", "key").await.unwrap_err();

        assert_eq!(seen.hits(), MAX_RETRIES as usize);
        assert!(matches!(
            &err,
            LlmError::Api { status: 503, message } if message == "The model is overloaded."
        ));
        assert!(!is_quota_error(&err));
    }

    #[tokio::test]
    async fn test_other_client_error_is_not_retried() {
        let (client, seen) = local_gemini(400, "plain bad request").await;

        let err = client.generate("prompt", "key").await.unwrap_err();

        assert_eq!(seen.hits(), 1);
        assert!(matches!(
            &err,
            LlmError::Api { status: 400, message } if message == "plain bad request"
        ));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_empty_content() {
        let (client, seen) = local_gemini(200, r#"{"candidates": []}"#).await;

        let err = client.generate("prompt", "key").await.unwrap_err();

        assert_eq!(seen.hits(), 1);
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[test]
    fn test_endpoint_uses_fixed_model() {
        let client = GeminiClient::new("https://example.test/").unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_response_text_joins_first_candidate_parts() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [
                    {"text": "1. Market Insight\n"},
                    {"text": "2. Campaign Concept"}
                ]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 40}
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            response.text().as_deref(),
            Some("1. Market Insight\n2. Campaign Concept")
        );
        assert_eq!(response.usage.unwrap().output_tokens, 40);
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_parse_error_message_extracts_api_message() {
        assert_eq!(
            parse_error_message(QUOTA_BODY.to_string()),
            "Resource has been exhausted (e.g. check quota)."
        );
    }

    #[test]
    fn test_parse_error_message_falls_back_to_raw_body() {
        assert_eq!(parse_error_message("bad gateway".to_string()), "bad gateway");
    }

    #[test]
    fn test_api_error_display_carries_status() {
        let err = LlmError::Api {
            status: 429,
            message: "Too Many Requests".to_string(),
        };
        assert_eq!(err.to_string(), "API error (status 429): Too Many Requests");
    }
}
