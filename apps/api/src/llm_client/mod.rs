/// LLM Client — the single point of entry for all generative-model calls.
///
/// ARCHITECTURAL RULE: No other module may call the provider API directly.
/// All LLM interactions MUST go through this module.
///
/// Model: gemini-2.5-flash (hardcoded — do not make configurable to prevent drift)
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod prompts;
pub mod retry;

use retry::{execute_with_retry, RetryPolicy};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// The model used for all LLM calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Retries exhausted after {retries} retries (last status {status})")]
    RetriesExhausted { retries: u32, status: u16 },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Network-level failure: the request never produced an HTTP status.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError(e.to_string())
    }
}

/// Status and raw body of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 429 and every 5xx are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        self.status == 429 || (500..600).contains(&self.status)
    }
}

/// Sends one request body to the generation endpoint. One call = one attempt.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, body: &Value) -> Result<RawResponse, TransportError>;
}

/// `generateContent` over HTTPS.
pub struct HttpTransport {
    client: Client,
    url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(api_key: String) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            url: format!("{GEMINI_API_BASE}/models/{MODEL}:generateContent"),
            api_key,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, body: &Value) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
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
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Extracts the text of the first part of the first candidate that carries any.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.iter().find_map(|p| p.text.as_deref()))
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Pulls `error.message` out of a provider error body, falling back to the raw body.
pub(crate) fn provider_error_message(body: &str) -> String {
    serde_json::from_str::<ProviderError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

/// The single LLM client used by all services.
/// Wraps the transport with retry logic and structured output helpers.
#[derive(Clone)]
pub struct LlmClient {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl LlmClient {
    pub fn new(api_key: String, policy: RetryPolicy) -> Result<Self, LlmError> {
        let transport = HttpTransport::new(api_key)?;
        Ok(Self::with_transport(Arc::new(transport), policy))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Makes a raw call to the provider, returning the decoded response envelope.
    /// Retries on 429 (rate limit), 5xx and transport errors with exponential backoff.
    pub async fn call(&self, body: &Value) -> Result<GenerateContentResponse, LlmError> {
        let raw = execute_with_retry(self.transport.as_ref(), body, &self.policy).await?;

        let response: GenerateContentResponse = serde_json::from_str(&raw.body)
            .map_err(|e| LlmError::MalformedResponse(format!("unexpected envelope: {e}")))?;

        if let Some(usage) = &response.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={:?}, output_tokens={:?}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(response)
    }

    /// Convenience method that calls the LLM and deserializes the text response as JSON.
    /// The request must ask the model for JSON output.
    pub async fn call_json<T: DeserializeOwned>(&self, body: &Value) -> Result<T, LlmError> {
        let response = self.call(body).await?;

        let text = response.text().ok_or_else(|| {
            let reason = response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_deref())
                .unwrap_or("no candidates");
            LlmError::MalformedResponse(format!("response carried no text ({reason})"))
        })?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use tokio::time::Instant;

    use super::*;

    /// Replays a fixed script of outcomes and records when each attempt happened.
    pub struct ScriptedTransport {
        script: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
        attempts: Mutex<Vec<Instant>>,
    }

    impl ScriptedTransport {
        pub fn new(script: Vec<Result<RawResponse, TransportError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                attempts: Mutex::new(Vec::new()),
            }
        }

        pub fn statuses(statuses: &[u16]) -> Self {
            Self::new(
                statuses
                    .iter()
                    .map(|&status| Ok(RawResponse { status, body: String::new() }))
                    .collect(),
            )
        }

        pub fn attempts(&self) -> Vec<Instant> {
            self.attempts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, _body: &Value) -> Result<RawResponse, TransportError> {
            self.attempts.lock().unwrap().push(Instant::now());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError("script exhausted".to_string())))
        }
    }

    /// A 200 envelope whose first part carries `text`.
    pub fn ok_with_text(text: &str) -> Result<RawResponse, TransportError> {
        let body = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }], "role": "model" },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 120, "candidatesTokenCount": 640 }
        });
        Ok(RawResponse {
            status: 200,
            body: body.to_string(),
        })
    }
}
