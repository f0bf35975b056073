//! Image upload endpoint

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, HeaderMap},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Multipart form field carrying the file
const IMAGE_FIELD: &str = "image";

/// Upper bound for a single upload body
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub message: &'static str,
}

/// POST /upload - multipart form with an `image` field
async fn upload_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let original = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        let file_name = state.images.save(&original, &content_type, &bytes).await?;
        let host = headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("localhost");

        return Ok(Json(UploadResponse {
            image_url: image_url(host, &file_name),
            message: "Image uploaded",
        }));
    }

    Err(ApiError::bad_request("missing multipart field 'image'"))
}

/// Public URL of a stored image, served by the static `/content` mount
fn image_url(host: &str, file_name: &str) -> String {
    format!("http://{}/content/images/{}", host, file_name)
}

/// Upload routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload", post(upload_image))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
