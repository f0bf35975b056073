//! Post endpoints: CRUD plus the trash lifecycle

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use inkpost_core::{ListFilter, Post, PostInput};
use serde::Serialize;

use crate::error::ApiError;
use crate::extractors::{JsonBody, ValidPostId};
use crate::state::AppState;

/// Response to a create or update
#[derive(Debug, Serialize)]
pub struct WriteReceipt {
    pub message: &'static str,
    /// Document file name, `<id>.md`
    pub path: String,
    /// Post id, as used in front-end routes
    pub url: String,
    pub title: String,
    pub created: String,
    pub updated: String,
}

impl WriteReceipt {
    fn new(message: &'static str, post: Post) -> Self {
        Self {
            message,
            path: post.file_name(),
            url: post.id,
            title: post.title,
            created: post.created,
            updated: post.updated,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Trash listing, wrapped unlike the main listing
#[derive(Debug, Serialize)]
pub struct TrashResponse {
    pub posts: Vec<Post>,
}

/// POST /posts
async fn create_post(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<PostInput>,
) -> Result<Json<WriteReceipt>, ApiError> {
    let post = state.posts.create(input).await?;
    Ok(Json(WriteReceipt::new("Post saved", post)))
}

/// GET /posts - posts outside the trash, optionally narrowed
async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state.posts.list_filtered(false, &filter).await?;
    Ok(Json(posts))
}

/// GET /posts/{id}
async fn get_post(
    State(state): State<Arc<AppState>>,
    ValidPostId(id): ValidPostId,
) -> Result<Json<Post>, ApiError> {
    Ok(Json(state.posts.read(&id).await?))
}

/// PUT /posts/{id}
async fn update_post(
    State(state): State<Arc<AppState>>,
    ValidPostId(id): ValidPostId,
    JsonBody(input): JsonBody<PostInput>,
) -> Result<Json<WriteReceipt>, ApiError> {
    let post = state.posts.update(&id, input).await?;
    Ok(Json(WriteReceipt::new("Post updated", post)))
}

/// DELETE /posts/{id} - move to trash
async fn trash_post(
    State(state): State<Arc<AppState>>,
    ValidPostId(id): ValidPostId,
) -> Result<Json<MessageResponse>, ApiError> {
    state.posts.soft_delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "Post moved to trash",
    }))
}

/// GET /trash
async fn list_trash(State(state): State<Arc<AppState>>) -> Result<Json<TrashResponse>, ApiError> {
    let posts = state.posts.list(true).await?;
    Ok(Json(TrashResponse { posts }))
}

/// POST /posts/{id}/restore
async fn restore_post(
    State(state): State<Arc<AppState>>,
    ValidPostId(id): ValidPostId,
) -> Result<Json<MessageResponse>, ApiError> {
    state.posts.restore(&id).await?;
    Ok(Json(MessageResponse {
        message: "Post restored",
    }))
}

/// DELETE /posts/{id}/permanent
async fn purge_post(
    State(state): State<Arc<AppState>>,
    ValidPostId(id): ValidPostId,
) -> Result<Json<MessageResponse>, ApiError> {
    state.posts.permanent_delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "Post permanently deleted",
    }))
}

/// Post routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", get(get_post).put(update_post).delete(trash_post))
        .route("/posts/{id}/restore", post(restore_post))
        .route("/posts/{id}/permanent", delete(purge_post))
        .route("/trash", get(list_trash))
}
