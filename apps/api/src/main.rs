mod config;
mod errors;
mod guide;
mod llm_client;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::guide::orchestrator::GuideFetcher;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Stay Guide API v{}", env!("CARGO_PKG_VERSION"));

    if config.gemini_api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; generation calls will be rejected upstream");
    }

    // Initialize LLM client
    let policy = config.retry_policy();
    let llm = LlmClient::new(config.gemini_api_key.clone(), policy)?;
    info!(
        "LLM client initialized (model: {}, max_retries: {}, initial_delay: {}ms)",
        llm_client::MODEL,
        llm.policy().max_retries,
        llm.policy().initial_delay.as_millis()
    );

    // Initialize wizard sessions and their expiry sweep
    let sessions = SessionStore::with_limits(config.session_limits());
    spawn_session_sweeper(sessions.clone());
    info!(
        "Session store initialized (ttl: {}min, max_sessions: {})",
        config.session_ttl_minutes, config.max_sessions
    );

    // Build app state
    let state = AppState {
        fetcher: GuideFetcher::new(llm),
        sessions,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the wizard front-end origin once it has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Evicts expired wizard sessions once a minute, independent of new traffic.
fn spawn_session_sweeper(sessions: SessionStore) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let evicted = sessions.evict_expired();
            if evicted > 0 {
                info!(
                    "Evicted {} expired wizard sessions ({} remaining)",
                    evicted,
                    sessions.len()
                );
            }
        }
    });
}
