//! Bounded exponential backoff around a single transport.
//!
//! Rate limits (429), server errors (5xx) and transport failures are retried.
//! Every other non-2xx status fails immediately. Delays double with each retry
//! and are not jittered.

use std::time::Duration;

use serde_json::Value;
use tracing::warn;

use super::{provider_error_message, LlmError, RawResponse, Transport};

/// How many times to retry, and how long to wait before the first retry.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt. `5` means up to 6 attempts.
    pub max_retries: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(1000),
        }
    }
}

/// Sends `body` until it succeeds, fails permanently, or the retry budget runs out.
///
/// Terminal outcomes:
/// - 2xx → `Ok(response)`
/// - non-retryable status → `LlmError::Api` on the first occurrence
/// - retryable status on the last attempt → `LlmError::RetriesExhausted`
/// - transport failure on the last attempt → that `LlmError::Transport`
pub async fn execute_with_retry(
    transport: &dyn Transport,
    body: &Value,
    policy: &RetryPolicy,
) -> Result<RawResponse, LlmError> {
    let mut retries_left = policy.max_retries;
    let mut delay = policy.initial_delay;
    let mut attempt: u32 = 1;

    loop {
        let failure = match transport.send(body).await {
            Ok(response) if response.is_success() => return Ok(response),
            Ok(response) if response.is_retryable() => {
                warn!(
                    "LLM API returned {} on attempt {}: {}",
                    response.status,
                    attempt,
                    provider_error_message(&response.body)
                );
                LlmError::RetriesExhausted {
                    retries: policy.max_retries,
                    status: response.status,
                }
            }
            Ok(response) => {
                return Err(LlmError::Api {
                    status: response.status,
                    message: provider_error_message(&response.body),
                });
            }
            Err(e) => {
                warn!("LLM transport failed on attempt {}: {}", attempt, e);
                LlmError::Transport(e)
            }
        };

        if retries_left == 0 {
            return Err(failure);
        }

        warn!(
            "Retrying LLM call after {}ms ({} retries left)",
            delay.as_millis(),
            retries_left
        );
        tokio::time::sleep(delay).await;

        delay = delay.saturating_mul(2);
        retries_left -= 1;
        attempt += 1;
    }
}
