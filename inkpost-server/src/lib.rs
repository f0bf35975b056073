//! inkpost-server: HTTP surface over the inkpost stores
//!
//! Axum server with:
//! - `/api` routes for posts, trash, photos, uploads and the passphrase check
//! - static files from the content directory under `/content`
//! - configurable CORS
//! - request tracing
//! - graceful shutdown
//! - JSON error responses

pub mod config;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{ConfigError, CorsConfig, ServerConfig};
pub use error::ApiError;
pub use server::{build_router, run_server, ServerError};
pub use state::AppState;
