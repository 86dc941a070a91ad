/// API route modules
pub mod auth;
pub mod collections;
pub mod health;
pub mod listening;
pub mod social;
pub mod tracks;
pub mod users;

use crate::{middleware, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Extension, Router,
};
use std::sync::Arc;
use tempo_core::types::CollectionKind;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Routes shared by playlists and genres; handlers read the kind from an extension
fn collection_routes(kind: CollectionKind) -> Router<AppState> {
    Router::new()
        .route("/", get(collections::list_owned).post(collections::create))
        .route("/discover", get(collections::discover))
        .route("/tags/popular", get(collections::popular_tags))
        .route("/shares/received", get(collections::received_shares))
        .route(
            "/:id",
            get(collections::get)
                .put(collections::update)
                .delete(collections::delete),
        )
        .route("/:id/tracks", post(collections::add_track))
        .route("/:id/tracks/order", put(collections::reorder_tracks))
        .route("/:id/tracks/:track_id", delete(collections::remove_track))
        .route("/:id/share", post(collections::share))
        .route("/:id/shares", get(collections::list_shares))
        .layer(Extension(kind))
}

/// Build the `/api` router with tracing and CORS layers
pub fn router(app_state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .nest("/playlists", collection_routes(CollectionKind::Playlist))
        .nest("/genres", collection_routes(CollectionKind::Genre))
        // Users and follows
        .route("/me", get(users::get_me).put(users::update_me))
        .route("/users/:id", get(users::get_user))
        .route(
            "/users/:id/follow",
            post(users::follow).delete(users::unfollow),
        )
        .route("/users/:id/followers", get(users::followers))
        .route("/users/:id/following", get(users::following))
        // Tracks
        .route("/tracks/resolve", post(tracks::resolve))
        .route("/tracks/:id", get(tracks::get_track))
        // Listening
        .route(
            "/favorites",
            get(listening::list_favorites).post(listening::add_favorite),
        )
        .route("/favorites/:track_id", delete(listening::remove_favorite))
        .route(
            "/recently-played",
            get(listening::recently_played).post(listening::record_play),
        )
        // Social
        .route("/feed", get(social::feed))
        .route("/posts", post(social::create_post))
        .route("/posts/:id", delete(social::delete_post))
        .route("/posts/:id/like", post(social::toggle_like))
        .route(
            "/posts/:id/comments",
            get(social::list_comments).post(social::add_comment),
        )
        .route("/comments/:id", delete(social::delete_comment))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&app_state.auth_service),
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
