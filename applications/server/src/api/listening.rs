/// Favorites and recently played API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tempo_core::types::{Track, TrackId, TrackReference};
use tempo_storage::listening;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u32>,
}

/// GET /api/favorites
pub async fn list_favorites(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Track>>> {
    Ok(Json(listening::list_favorites(&app_state.pool, auth.user_id()).await?))
}

/// POST /api/favorites
pub async fn add_favorite(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(reference): Json<TrackReference>,
) -> Result<Json<Track>> {
    let track = listening::add_favorite(&app_state.pool, &app_state.catalog, auth.user_id(), &reference).await?;
    Ok(Json(track))
}

/// DELETE /api/favorites/:track_id
pub async fn remove_favorite(
    Path(track_id): Path<TrackId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    let removed = listening::remove_favorite(&app_state.pool, auth.user_id(), track_id).await?;
    Ok(Json(serde_json::json!({ "success": removed })))
}

/// GET /api/recently-played
pub async fn recently_played(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<Track>>> {
    let cap = app_state.listening.recently_played_cap;
    let limit = params.limit.filter(|l| *l > 0).unwrap_or(cap).min(cap);

    Ok(Json(listening::recently_played(&app_state.pool, auth.user_id(), limit).await?))
}

/// POST /api/recently-played
pub async fn record_play(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(reference): Json<TrackReference>,
) -> Result<Json<Track>> {
    let track = listening::record_play(
        &app_state.pool,
        &app_state.catalog,
        auth.user_id(),
        &reference,
        app_state.listening.recently_played_cap,
    )
    .await?;

    Ok(Json(track))
}
