/// User profile and follow API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tempo_core::types::{FollowEdge, UpdateProfile, User, UserId};
use tempo_storage::{social, users};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub follower_count: usize,
    pub following_count: usize,
    /// Whether the requester follows this user
    pub is_following: bool,
}

/// GET /api/me
pub async fn get_me(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<User>> {
    let user = users::require(&app_state.pool, auth.user_id()).await?;
    Ok(Json(user))
}

/// PUT /api/me
pub async fn update_me(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<UpdateProfile>,
) -> Result<Json<User>> {
    let user = users::update_profile(&app_state.pool, auth.user_id(), req).await?;
    Ok(Json(user))
}

/// GET /api/users/:id
/// Public profile; email is only shown to its owner
pub async fn get_user(
    Path(id): Path<UserId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<UserProfile>> {
    let mut user = users::require(&app_state.pool, id).await?;
    if user.id != auth.user_id() {
        user.email = None;
    }

    let follower_count = social::followers(&app_state.pool, id).await?.len();
    let following_count = social::following(&app_state.pool, id).await?.len();
    let is_following = social::is_following(&app_state.pool, auth.user_id(), id).await?;

    Ok(Json(UserProfile {
        user,
        follower_count,
        following_count,
        is_following,
    }))
}

/// POST /api/users/:id/follow
pub async fn follow(
    Path(id): Path<UserId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    social::follow(&app_state.pool, auth.user_id(), id).await?;
    Ok(Json(serde_json::json!({ "following": true })))
}

/// DELETE /api/users/:id/follow
pub async fn unfollow(
    Path(id): Path<UserId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    social::unfollow(&app_state.pool, auth.user_id(), id).await?;
    Ok(Json(serde_json::json!({ "following": false })))
}

/// GET /api/users/:id/followers
pub async fn followers(
    Path(id): Path<UserId>,
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<Vec<FollowEdge>>> {
    Ok(Json(social::followers(&app_state.pool, id).await?))
}

/// GET /api/users/:id/following
pub async fn following(
    Path(id): Path<UserId>,
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<Vec<FollowEdge>>> {
    Ok(Json(social::following(&app_state.pool, id).await?))
}
