//! Photo endpoints over the JSON photo document

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use inkpost_core::photos::PhotoCollection;
use inkpost_core::{Photo, PhotoInput};
use serde::Deserialize;

use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::routes::posts::MessageResponse;
use crate::state::AppState;

/// `?category=`; `all` or empty means every photo
#[derive(Debug, Default, Deserialize)]
pub struct PhotoQuery {
    pub category: Option<String>,
}

/// POST /photos
async fn create_photo(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<PhotoInput>,
) -> Result<Json<Photo>, ApiError> {
    Ok(Json(state.photos.create(input).await?))
}

/// GET /photos
async fn list_photos(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PhotoQuery>,
) -> Result<Json<PhotoCollection>, ApiError> {
    Ok(Json(state.photos.list(query.category.as_deref()).await?))
}

/// GET /photos/{id}
async fn get_photo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Photo>, ApiError> {
    Ok(Json(state.photos.get(&id).await?))
}

/// PUT /photos/{id}
async fn update_photo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<PhotoInput>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.photos.update(&id, input).await?;
    Ok(Json(MessageResponse {
        message: "Photo updated",
    }))
}

/// DELETE /photos/{id}
async fn delete_photo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.photos.delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "Photo deleted",
    }))
}

/// Photo routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/photos", get(list_photos).post(create_photo))
        .route(
            "/photos/{id}",
            get(get_photo).put(update_photo).delete(delete_photo),
        )
}
