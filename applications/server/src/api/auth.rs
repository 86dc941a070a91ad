/// Authentication API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tempo_core::types::User;
use tempo_storage::users;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
}

fn invalid_credentials() -> ServerError {
    ServerError::Auth("Invalid username or password".to_string())
}

/// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user = users::get_by_username(&app_state.pool, &req.username)
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_hash = users::get_password_hash(&app_state.pool, user.id)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !app_state.auth_service.verify_password(&req.password, &password_hash)? {
        tracing::warn!(username = %req.username, "failed login");
        return Err(invalid_credentials());
    }

    let access_token = app_state.auth_service.create_access_token(&user)?;
    let refresh_token = app_state.auth_service.create_refresh_token(&user)?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        user,
    }))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(app_state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    let claims = app_state.auth_service.verify_refresh_token(&req.refresh_token)?;

    // Reload so the new token carries the current email
    let user = users::get_by_id(&app_state.pool, claims.user_id()?)
        .await?
        .ok_or_else(|| ServerError::Auth("User no longer exists".to_string()))?;

    let access_token = app_state.auth_service.create_access_token(&user)?;

    Ok(Json(RefreshResponse {
        access_token,
        token_type: "Bearer".to_string(),
    }))
}
