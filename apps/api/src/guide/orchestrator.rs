//! Guide fetch — orchestrates a single generation.
//!
//! Flow: build_request → LlmClient (retrying executor) → extract text →
//!       parse StayGuide → return.
//!
//! Only transport and rate-limit/server failures are retried, and only inside
//! the executor. A malformed or unparseable response fails the call outright.

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::guide::builder::build_request;
use crate::guide::models::{GenerationConfig, StayGuide};
use crate::llm_client::{LlmClient, LlmError};
use crate::session::SessionStore;

/// Questions the prompt asks for. Other counts are logged, not rejected.
pub const EXPECTED_QUESTION_COUNT: usize = 7;

#[derive(Clone)]
pub struct GuideFetcher {
    llm: LlmClient,
}

impl GuideFetcher {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    /// Generates one guide for a validated config.
    pub async fn fetch(&self, config: &GenerationConfig) -> Result<StayGuide, LlmError> {
        let payload = build_request(config);

        let guide: StayGuide = self.llm.call_json(&payload.to_request_body()).await?;

        let questions = guide.question_count();
        if questions != EXPECTED_QUESTION_COUNT {
            warn!(
                "Guide has {} questions (expected {}) across {} categories",
                questions,
                EXPECTED_QUESTION_COUNT,
                guide.tiered_questions.len()
            );
        }

        Ok(guide)
    }
}

/// Runs `fetch` against a session's stored answers and records the outcome on the session.
pub async fn generate_for_session(
    store: &SessionStore,
    fetcher: &GuideFetcher,
    session_id: Uuid,
) -> Result<StayGuide, AppError> {
    let in_flight = store.begin_generation(session_id)?;
    info!("Generating guide for session {session_id}");

    match fetcher.fetch(in_flight.config()).await {
        Ok(guide) => {
            info!(
                "Generated guide for session {}: {} questions, {} action rows",
                session_id,
                guide.question_count(),
                guide.action_matrix.len()
            );
            in_flight.succeed(guide.clone());
            Ok(guide)
        }
        Err(e) => {
            in_flight.fail();
            Err(AppError::Generation(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::guide::models::fixtures::{config, guide_json};
    use crate::guide::models::AnswersPatch;
    use crate::llm_client::retry::RetryPolicy;
    use crate::llm_client::testing::{ok_with_text, ScriptedTransport};
    use crate::llm_client::{RawResponse, TransportError};
    use crate::session::FetchStatus;

    fn fetcher(script: Vec<Result<RawResponse, TransportError>>) -> GuideFetcher {
        GuideFetcher::new(LlmClient::with_transport(
            Arc::new(ScriptedTransport::new(script)),
            RetryPolicy {
                max_retries: 2,
                initial_delay: Duration::from_millis(1000),
            },
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_returns_parsed_guide() {
        let guide = fetcher(vec![ok_with_text(&guide_json())])
            .fetch(&config())
            .await
            .unwrap();
        assert_eq!(guide.question_count(), 7);
        assert_eq!(guide.action_matrix.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_retries_rate_limit_before_parsing() {
        let script = vec![
            Ok(RawResponse {
                status: 429,
                body: String::new(),
            }),
            ok_with_text(&guide_json()),
        ];
        assert!(fetcher(script).fetch(&config()).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_action_matrix_is_parse_error() {
        let text = json!({
            "openingScript": "Thanks for meeting.",
            "tieredQuestions": [{ "category": "Growth", "questions": ["Q1?"] }]
        })
        .to_string();

        let err = fetcher(vec![ok_with_text(&text)])
            .fetch(&config())
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Parse(_)), "got {err:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_parse_failure_is_not_retried() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            ok_with_text("not json at all"),
            ok_with_text(&guide_json()),
        ]));
        let fetcher = GuideFetcher::new(LlmClient::with_transport(
            transport.clone(),
            RetryPolicy::default(),
        ));

        let err = fetcher.fetch(&config()).await.unwrap_err();

        assert!(matches!(err, LlmError::Parse(_)));
        assert_eq!(transport.attempts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_text_is_malformed_response() {
        let script = vec![Ok(RawResponse {
            status: 200,
            body: json!({ "candidates": [] }).to_string(),
        })];

        let err = fetcher(script).fetch(&config()).await.unwrap_err();

        assert!(matches!(err, LlmError::MalformedResponse(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_for_session_stores_guide() {
        let store = SessionStore::new();
        let id = store.create().id;
        let c = config();
        store
            .update_answers(
                id,
                AnswersPatch {
                    trigger: Some(c.trigger),
                    interview_type: Some(c.interview_type),
                    persona: Some(c.persona),
                    sentiment: Some(c.sentiment),
                    ..Default::default()
                },
            )
            .unwrap();

        let guide = generate_for_session(&store, &fetcher(vec![ok_with_text(&guide_json())]), id)
            .await
            .unwrap();

        let session = store.get(id).unwrap();
        assert_eq!(session.status, FetchStatus::Done);
        assert_eq!(session.guide, Some(guide));
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_for_session_marks_failure() {
        let store = SessionStore::new();
        let id = store.create().id;
        let c = config();
        store
            .update_answers(
                id,
                AnswersPatch {
                    trigger: Some(c.trigger),
                    interview_type: Some(c.interview_type),
                    persona: Some(c.persona),
                    sentiment: Some(c.sentiment),
                    ..Default::default()
                },
            )
            .unwrap();
        let script = vec![Ok(RawResponse {
            status: 400,
            body: String::new(),
        })];

        let err = generate_for_session(&store, &fetcher(script), id)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Generation(LlmError::Api { status: 400, .. })));
        assert_eq!(store.get(id).unwrap().status, FetchStatus::Failed);
    }
}
