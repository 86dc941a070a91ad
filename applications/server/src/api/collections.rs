/// Playlist and genre API routes
///
/// Mounted once per kind; the `CollectionKind` extension selects which.
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tempo_core::types::*;
use tempo_storage::{collections, discovery, shares, tracks};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionRequest {
    pub name: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub track_ids: Vec<TrackId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareBody {
    pub target_user_id: Option<UserId>,
    #[serde(default)]
    pub share_type: ShareType,
    pub message: Option<String>,
}

/// Query string for discovery; `tags` is comma-separated
#[derive(Debug, Default, Deserialize)]
pub struct DiscoverParams {
    pub search: Option<String>,
    pub tags: Option<String>,
    pub sort: Option<DiscoverSort>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTrackResponse {
    pub added: bool,
    pub track: Track,
}

/// GET /api/{kind}s
/// Collections owned by the authenticated user
pub async fn list_owned(
    State(app_state): State<AppState>,
    Extension(kind): Extension<CollectionKind>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Collection>>> {
    let owned = collections::list_owned(&app_state.pool, kind, auth.user_id()).await?;
    Ok(Json(owned))
}

/// POST /api/{kind}s
pub async fn create(
    State(app_state): State<AppState>,
    Extension(kind): Extension<CollectionKind>,
    auth: AuthenticatedUser,
    Json(req): Json<CreateCollectionRequest>,
) -> Result<(StatusCode, Json<Collection>)> {
    let collection = collections::create(
        &app_state.pool,
        CreateCollection {
            kind,
            owner_id: auth.user_id(),
            name: req.name,
            description: req.description,
            cover_image: req.cover_image,
            color: req.color,
            is_public: req.is_public,
            tags: req.tags,
        },
    )
    .await?;

    tracing::info!(%kind, id = collection.id, owner_id = collection.owner_id, "created collection");
    Ok((StatusCode::CREATED, Json(collection)))
}

/// GET /api/{kind}s/discover
/// Public collections of other users
pub async fn discover(
    State(app_state): State<AppState>,
    Extension(kind): Extension<CollectionKind>,
    auth: AuthenticatedUser,
    Query(params): Query<DiscoverParams>,
) -> Result<Json<DiscoverPage>> {
    let query = DiscoverQuery {
        search: params.search,
        tags: params
            .tags
            .as_deref()
            .map(|tags| tags.split(',').map(str::to_string).collect())
            .unwrap_or_default(),
        sort: params.sort.unwrap_or_default(),
        limit: app_state.discovery.page_size(params.limit),
        offset: params.offset.unwrap_or(0),
    };

    let page = discovery::discover(&app_state.pool, kind, auth.user_id(), &query).await?;
    Ok(Json(page))
}

/// GET /api/{kind}s/tags/popular
pub async fn popular_tags(
    State(app_state): State<AppState>,
    Extension(kind): Extension<CollectionKind>,
    _auth: AuthenticatedUser,
    Query(params): Query<LimitParams>,
) -> Result<Json<Vec<TagCount>>> {
    let limit = params
        .limit
        .filter(|limit| *limit > 0)
        .unwrap_or(app_state.discovery.popular_tags_limit)
        .min(app_state.discovery.max_limit);

    let tags = discovery::popular_tags(&app_state.pool, kind, limit).await?;
    Ok(Json(tags))
}

/// GET /api/{kind}s/:id
/// Collection details with tracks
pub async fn get(
    Path(id): Path<CollectionId>,
    State(app_state): State<AppState>,
    Extension(kind): Extension<CollectionKind>,
    auth: AuthenticatedUser,
) -> Result<Json<Collection>> {
    let collection = collections::get_with_tracks(&app_state.pool, kind, id, auth.user_id()).await?;
    Ok(Json(collection))
}

/// PUT /api/{kind}s/:id
pub async fn update(
    Path(id): Path<CollectionId>,
    State(app_state): State<AppState>,
    Extension(kind): Extension<CollectionKind>,
    auth: AuthenticatedUser,
    Json(req): Json<UpdateCollection>,
) -> Result<Json<Collection>> {
    let collection = collections::update(&app_state.pool, kind, id, auth.user_id(), req).await?;
    Ok(Json(collection))
}

/// DELETE /api/{kind}s/:id
pub async fn delete(
    Path(id): Path<CollectionId>,
    State(app_state): State<AppState>,
    Extension(kind): Extension<CollectionKind>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    collections::delete(&app_state.pool, kind, id, auth.user_id()).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/{kind}s/:id/tracks
/// Resolve a track reference and append it
pub async fn add_track(
    Path(id): Path<CollectionId>,
    State(app_state): State<AppState>,
    Extension(kind): Extension<CollectionKind>,
    auth: AuthenticatedUser,
    Json(reference): Json<TrackReference>,
) -> Result<Json<AddTrackResponse>> {
    // Owner check precedes resolution so a rejected request creates no track
    collections::get_owned(&app_state.pool, kind, id, auth.user_id()).await?;

    let track = tracks::resolve(&app_state.pool, &app_state.catalog, &reference).await?;
    let added = collections::add_track(&app_state.pool, kind, id, track.id, auth.user_id()).await?;

    Ok(Json(AddTrackResponse { added, track }))
}

/// DELETE /api/{kind}s/:id/tracks/:track_id
pub async fn remove_track(
    Path((id, track_id)): Path<(CollectionId, TrackId)>,
    State(app_state): State<AppState>,
    Extension(kind): Extension<CollectionKind>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    collections::remove_track(&app_state.pool, kind, id, track_id, auth.user_id()).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// PUT /api/{kind}s/:id/tracks/order
pub async fn reorder_tracks(
    Path(id): Path<CollectionId>,
    State(app_state): State<AppState>,
    Extension(kind): Extension<CollectionKind>,
    auth: AuthenticatedUser,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<Vec<CollectionTrack>>> {
    collections::reorder_tracks(&app_state.pool, kind, id, &req.track_ids, auth.user_id()).await?;
    let members = collections::get_tracks(&app_state.pool, kind, id, None).await?;
    Ok(Json(members))
}

/// POST /api/{kind}s/:id/share
pub async fn share(
    Path(id): Path<CollectionId>,
    State(app_state): State<AppState>,
    Extension(kind): Extension<CollectionKind>,
    auth: AuthenticatedUser,
    Json(req): Json<ShareBody>,
) -> Result<(StatusCode, Json<ShareOutcome>)> {
    let outcome = shares::share(
        &app_state.pool,
        ShareRequest {
            kind,
            source_id: id,
            sharer_id: auth.user_id(),
            target_user_id: req.target_user_id,
            share_type: req.share_type,
            message: req.message,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

/// GET /api/{kind}s/:id/shares
/// Audit records for an owned collection
pub async fn list_shares(
    Path(id): Path<CollectionId>,
    State(app_state): State<AppState>,
    Extension(kind): Extension<CollectionKind>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<ShareRecord>>> {
    let records = shares::list_for_collection(&app_state.pool, kind, id, auth.user_id()).await?;
    Ok(Json(records))
}

/// GET /api/{kind}s/shares/received
pub async fn received_shares(
    State(app_state): State<AppState>,
    Extension(kind): Extension<CollectionKind>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<ShareRecord>>> {
    let records = shares::list_received(&app_state.pool, kind, auth.user_id()).await?;
    Ok(Json(records))
}
