//! Axum server setup
//!
//! Server skeleton with:
//! - `/api` resource routes
//! - static content under `/content`
//! - CORS from configuration
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::sync::Arc;

use axum::Router;
use inkpost_core::{BlogConfig, StoreError};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{ConfigError, ServerConfig};
use crate::routes;
use crate::state::AppState;

/// Build the application router over opened stores
pub fn build_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    let content = ServeDir::new(&state.config().content_dir);

    let api = Router::new()
        .merge(routes::posts::router())
        .merge(routes::photos::router())
        .merge(routes::uploads::router())
        .merge(routes::auth::router());

    Router::new()
        .merge(routes::health::router())
        .nest("/api", api)
        .nest_service("/content", content)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let config = ServerConfig::from_env()?;
/// run_server(config, BlogConfig::from_env()).await?;
/// ```
pub async fn run_server(config: ServerConfig, blog: BlogConfig) -> Result<(), ServerError> {
    tracing::info!(
        content_dir = %blog.content_dir.display(),
        photos_file = %blog.photos_file.display(),
        "Blog config loaded"
    );

    let cors = config.cors.layer()?;
    let state = AppState::open(blog, config.secret_passphrase.clone()).await?;
    tracing::info!(zone = %state.posts.clock().zone_name(), "Civil clock ready");
    let app = build_router(Arc::new(state), cors);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolve once Ctrl+C or SIGTERM arrives.
///
/// A handler that cannot be installed never fires; the other one still can.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Ctrl+C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
        "Ctrl+C"
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("SIGTERM handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
        "SIGTERM"
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    let received = tokio::select! {
        name = ctrl_c => name,
        name = terminate => name,
    };
    tracing::info!(signal = received, "Starting shutdown");
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to open content store: {0}")]
    Store(#[from] StoreError),
}
