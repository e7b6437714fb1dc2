//! Vigil Auth API
//!
//! HTTP front for the session lifecycle manager: token issuance, refresh
//! rotation, logout, and credential introspection.

mod config;
mod error;
mod handlers;
mod state;

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use vigil_auth_core::{AnomalyDispatcher, MemoryRevocationStore, SessionLifecycle, WebhookNotifier};
use vigil_db::PgSessionStore;

use crate::config::Config;
use crate::state::AppState;

/// Upper bound on live revocation entries in the in-process ledger
const REVOCATION_CAPACITY: u64 = 100_000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Vigil Auth API");

    let config = Config::from_env()?;

    // Wire the lifecycle manager to its collaborators
    let pool = vigil_db::create_pool(&config.database_url).await?;
    let store = Arc::new(PgSessionStore::new(pool.clone()));
    let revocations = Arc::new(MemoryRevocationStore::new(REVOCATION_CAPACITY));

    let notifier = Arc::new(WebhookNotifier::new(&config.webhook_url));
    let (dispatcher, _dispatcher_handle) = AnomalyDispatcher::new(notifier, config.notify_buffer);

    let lifecycle = SessionLifecycle::new(config.auth.clone(), store, revocations, dispatcher);

    let http_port = config.http_port;
    let state = AppState::new(lifecycle, pool, config);

    // Build router
    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .route("/api/v1/auth/tokens", get(handlers::issue))
        .route("/api/v1/auth/tokens/refresh", post(handlers::refresh))
        .route("/api/v1/auth/logout", post(handlers::logout))
        .route("/api/v1/auth/whoami", get(handlers::whoami))
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], http_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
