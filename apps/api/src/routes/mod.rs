pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::guide::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Wizard
        .route("/api/v1/wizard/options", get(handlers::handle_wizard_options))
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/answers",
            patch(handlers::handle_update_answers),
        )
        .route("/api/v1/sessions/:id/reset", post(handlers::handle_reset))
        // Generation
        .route(
            "/api/v1/sessions/:id/generate",
            post(handlers::handle_generate),
        )
        .route(
            "/api/v1/guides/generate",
            post(handlers::handle_generate_stateless),
        )
        // Export
        .route(
            "/api/v1/sessions/:id/export/html",
            get(handlers::handle_export_html),
        )
        .route(
            "/api/v1/sessions/:id/export/text",
            get(handlers::handle_export_text),
        )
        .route("/api/v1/sessions/:id/handoff", get(handlers::handle_handoff))
        .with_state(state)
}
