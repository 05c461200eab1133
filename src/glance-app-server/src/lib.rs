//! Glance App Server - HTTP API for the Glance generation pipeline.
//!
//! This crate provides:
//! - REST API for generation (explain, preview)
//! - Export to PNG/PDF via headless Chrome
//! - Local history management
//! - Health checks

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::ServerConfig;
pub use error::{AppError, AppResult};
pub use state::AppState;

/// Run the server with the given configuration.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    run_with_shutdown(config, std::future::pending()).await
}

/// Run the server with graceful shutdown support.
pub async fn run_with_shutdown<F>(config: ServerConfig, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = config.listen_addr.parse()?;
    let state = Arc::new(AppState::new(config).map_err(|e| anyhow::anyhow!(e.to_string()))?);
    let app = create_router(state);

    info!("Starting Glance server on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shut down");
    Ok(())
}

/// Create the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/explain", post(handlers::explain))
        .route("/preview", post(handlers::preview))
        .route("/export", post(handlers::export))
        .route(
            "/history",
            get(handlers::list_history)
                .post(handlers::add_history)
                .delete(handlers::clear_history),
        )
        .route("/history/usage", get(handlers::history_usage))
        .route("/history/{id}", delete(handlers::delete_history));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
