use crate::guide::orchestrator::GuideFetcher;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: GuideFetcher,
    /// In-memory wizard sessions. Lost on restart.
    pub sessions: SessionStore,
}
