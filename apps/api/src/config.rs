use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::retry::RetryPolicy;
use crate::session::SessionLimits;

/// Application configuration loaded from environment variables.
/// Fails at startup if a numeric variable is present but unparseable.
#[derive(Debug, Clone)]
pub struct Config {
    /// May be empty; key provisioning is handled outside this service.
    pub gemini_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub llm_max_retries: u32,
    pub llm_initial_delay_ms: u64,
    pub session_ttl_minutes: i64,
    pub max_sessions: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_max_retries: parse_env("LLM_MAX_RETRIES", 5)?,
            llm_initial_delay_ms: parse_env("LLM_INITIAL_DELAY_MS", 1000)?,
            session_ttl_minutes: parse_env("SESSION_TTL_MINUTES", 60)?,
            max_sessions: parse_env("MAX_SESSIONS", 10_000)?,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.llm_max_retries,
            initial_delay: Duration::from_millis(self.llm_initial_delay_ms),
        }
    }

    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            ttl: chrono::Duration::minutes(self.session_ttl_minutes),
            max_sessions: self.max_sessions,
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default_when_unset() {
        let value: u32 = parse_env("STAYGUIDE_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("STAYGUIDE_TEST_BAD_NUMBER", "five");
        let result: Result<u32> = parse_env("STAYGUIDE_TEST_BAD_NUMBER", 5);
        assert!(result.is_err());
    }

    fn config() -> Config {
        Config {
            gemini_api_key: String::new(),
            port: 8080,
            rust_log: "info".to_string(),
            llm_max_retries: 3,
            llm_initial_delay_ms: 250,
            session_ttl_minutes: 15,
            max_sessions: 50,
        }
    }

    #[test]
    fn test_retry_policy_uses_configured_values() {
        let policy = config().retry_policy();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.initial_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_session_limits_use_configured_values() {
        let limits = config().session_limits();
        assert_eq!(limits.ttl, chrono::Duration::minutes(15));
        assert_eq!(limits.max_sessions, 50);
    }
}
