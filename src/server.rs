//! Router construction and the serve loop shared by both binaries.

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use log::info;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::twitter::TwitterClient;

/// Context handed to every request handler.
///
/// Built once at startup. Everything inside is immutable, so clones are cheap
/// and shared by concurrent tool calls without locking.
#[derive(Clone, Debug)]
pub struct AppState {
    pub twitter: Arc<TwitterClient>,
}

impl AppState {
    pub fn new(twitter: TwitterClient) -> Self {
        AppState {
            twitter: Arc::new(twitter),
        }
    }
}

/// Builds the HTTP application with all routes.
///
/// - `GET /`: service banner
/// - `GET /health`: health check
/// - `POST /mcp`: MCP JSON-RPC endpoint
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(crate::handlers::handle_root))
        .route("/health", get(crate::handlers::handle_health))
        .route("/mcp", post(crate::handlers::handle_mcp))
        .with_state(state)
}

/// Binds the configured address and serves until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve<F>(
    state: AppState,
    config: &ServerConfig,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves when the process receives Ctrl+C.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Interrupt received, shutting down"),
        Err(e) => {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            // Without a signal handler there is nothing to wait for; keep serving
            std::future::pending::<()>().await;
        }
    }
}
