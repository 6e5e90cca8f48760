//! Axum route handlers for the wizard and Guide API.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::guide::export::{render_html, render_text};
use crate::guide::handoff::build_handoff_url;
use crate::guide::models::{AnswersPatch, GenerationConfig, StayGuide};
use crate::guide::options::{wizard_steps, WizardStep};
use crate::guide::orchestrator::generate_for_session;
use crate::session::{FetchStatus, WizardSession};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct WizardOptionsResponse {
    pub steps: Vec<WizardStep>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Wizard step, 1 through 4.
    pub step: u8,
    pub status: FetchStatus,
    pub ready_to_generate: bool,
    pub answers: GenerationConfig,
    pub guide: Option<StayGuide>,
}

impl From<WizardSession> for SessionResponse {
    fn from(session: WizardSession) -> Self {
        Self {
            session_id: session.id,
            created_at: session.created_at,
            updated_at: session.updated_at,
            step: session.stage().step(),
            status: session.status,
            ready_to_generate: session.ready_to_generate(),
            answers: session.answers,
            guide: session.guide,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GuideResponse {
    pub guide: StayGuide,
}

#[derive(Debug, Serialize)]
pub struct HandoffResponse {
    pub url: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/wizard/options
pub async fn handle_wizard_options() -> Json<WizardOptionsResponse> {
    Json(WizardOptionsResponse {
        steps: wizard_steps(),
    })
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let session = state.sessions.create();
    (StatusCode::CREATED, Json(session.into()))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(state.sessions.get(id)?.into()))
}

/// PATCH /api/v1/sessions/:id/answers
///
/// Merges the fields answered on one wizard step.
pub async fn handle_update_answers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<AnswersPatch>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(state.sessions.update_answers(id, patch)?.into()))
}

/// POST /api/v1/sessions/:id/generate
///
/// Generates a guide from the session's answers. 409 if one is already in flight.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GuideResponse>, AppError> {
    let guide = generate_for_session(&state.sessions, &state.fetcher, id).await?;
    Ok(Json(GuideResponse { guide }))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(state.sessions.reset(id)?.into()))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/sessions/:id/export/html
pub async fn handle_export_html(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let (guide, answers) = state.sessions.guide(id)?;
    Ok(Html(render_html(&guide, &answers)))
}

/// GET /api/v1/sessions/:id/export/text
pub async fn handle_export_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (guide, _) = state.sessions.guide(id)?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_text(&guide),
    ))
}

/// GET /api/v1/sessions/:id/handoff
pub async fn handle_handoff(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HandoffResponse>, AppError> {
    let (guide, _) = state.sessions.guide(id)?;
    let url = build_handoff_url(&guide)?;
    Ok(Json(HandoffResponse { url: url.into() }))
}

/// POST /api/v1/guides/generate
///
/// One-shot generation from a complete config, without a session.
pub async fn handle_generate_stateless(
    State(state): State<AppState>,
    Json(config): Json<GenerationConfig>,
) -> Result<Json<GuideResponse>, AppError> {
    config.validate()?;
    let guide = state.fetcher.fetch(&config).await?;
    Ok(Json(GuideResponse { guide }))
}
