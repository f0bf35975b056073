//! Health check endpoint
//!
//! Reports `ok` only while the posts directory can be listed; a missing or
//! unreadable content mount answers 503 so a proxy can stop routing to us.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tokio::fs;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Whether the posts directory could be read
    pub content_readable: bool,
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let posts_dir = state.config().posts_dir();
    let content_readable = match fs::read_dir(&posts_dir).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Posts directory {} unreadable: {}", posts_dir.display(), e);
            false
        }
    };

    let (code, status) = if content_readable {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            content_readable,
        }),
    )
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpost_core::BlogConfig;
    use tempfile::TempDir;

    async fn open_state(temp: &TempDir) -> Arc<AppState> {
        let blog = BlogConfig::with_root(temp.path().to_path_buf());
        Arc::new(AppState::open(blog, "pw").await.unwrap())
    }

    #[tokio::test]
    async fn readable_content_is_ok() {
        let temp = TempDir::new().unwrap();
        let state = open_state(&temp).await;

        let (code, Json(body)) = health(State(state)).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert!(body.content_readable);
    }

    #[tokio::test]
    async fn missing_posts_dir_is_degraded() {
        let temp = TempDir::new().unwrap();
        let state = open_state(&temp).await;
        fs::remove_dir_all(state.config().posts_dir()).await.unwrap();

        let (code, Json(body)) = health(State(state)).await;
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "degraded");
        assert!(!body.content_readable);
    }
}
