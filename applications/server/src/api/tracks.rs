/// Tracks API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use tempo_core::{
    types::{Track, TrackId, TrackReference},
    TempoError,
};
use tempo_storage::tracks;

/// POST /api/tracks/resolve
/// Turn a loose track reference into a canonical track, creating it if needed
pub async fn resolve(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    Json(reference): Json<TrackReference>,
) -> Result<Json<Track>> {
    let track = tracks::resolve(&app_state.pool, &app_state.catalog, &reference).await?;
    Ok(Json(track))
}

/// GET /api/tracks/:id
pub async fn get_track(
    Path(id): Path<TrackId>,
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<Track>> {
    let track = tracks::get_by_id(&app_state.pool, id)
        .await?
        .ok_or_else(|| TempoError::not_found("Track", id))?;

    Ok(Json(track))
}
