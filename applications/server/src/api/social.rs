/// Feed, posts, likes and comments API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tempo_core::types::{Comment, CommentId, CreatePost, Post, PostId};
use tempo_storage::social;

#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

/// GET /api/feed
/// Posts by the user and everyone they follow
pub async fn feed(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(params): Query<FeedParams>,
) -> Result<Json<Vec<Post>>> {
    let limit = app_state.discovery.page_size(params.limit);
    let posts = social::feed(&app_state.pool, auth.user_id(), limit, params.offset.unwrap_or(0)).await?;
    Ok(Json(posts))
}

/// POST /api/posts
pub async fn create_post(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreatePost>,
) -> Result<(StatusCode, Json<Post>)> {
    let post = social::create_post(&app_state.pool, auth.user_id(), req).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// DELETE /api/posts/:id
pub async fn delete_post(
    Path(id): Path<PostId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    social::delete_post(&app_state.pool, id, auth.user_id()).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/posts/:id/like
/// Toggle; responds with the new state
pub async fn toggle_like(
    Path(id): Path<PostId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    let liked = social::toggle_like(&app_state.pool, id, auth.user_id()).await?;
    Ok(Json(serde_json::json!({ "liked": liked })))
}

/// GET /api/posts/:id/comments
pub async fn list_comments(
    Path(id): Path<PostId>,
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<Vec<Comment>>> {
    Ok(Json(social::list_comments(&app_state.pool, id).await?))
}

/// POST /api/posts/:id/comments
pub async fn add_comment(
    Path(id): Path<PostId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CommentRequest>,
) -> Result<(StatusCode, Json<Comment>)> {
    let comment = social::add_comment(&app_state.pool, id, auth.user_id(), &req.content).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// DELETE /api/comments/:id
pub async fn delete_comment(
    Path(id): Path<CommentId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    social::delete_comment(&app_state.pool, id, auth.user_id()).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
