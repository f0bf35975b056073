//! Editor passphrase check

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PassphraseRequest {
    pub passphrase: String,
}

/// Always 200; the verdict is in the body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassphraseResponse {
    pub is_valid: bool,
    pub message: &'static str,
}

/// POST /validate-passphrase
async fn validate_passphrase(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<PassphraseRequest>,
) -> Result<Json<PassphraseResponse>, ApiError> {
    let is_valid = check_passphrase(&state.passphrase, &req.passphrase);
    if !is_valid {
        tracing::warn!("Rejected editor passphrase");
    }

    Ok(Json(PassphraseResponse {
        is_valid,
        message: if is_valid {
            "Verification succeeded"
        } else {
            "Verification failed"
        },
    }))
}

/// An unset secret never matches
fn check_passphrase(secret: &str, candidate: &str) -> bool {
    !secret.is_empty() && secret == candidate
}

/// Auth routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/validate-passphrase", post(validate_passphrase))
}
