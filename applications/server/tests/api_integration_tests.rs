/// API integration tests
/// Tests complete HTTP request/response cycles with real database
mod common;

use axum::http::{Method, StatusCode};
use common::{fixtures, TestApp};
use serde_json::json;

/// Test GET /api/health needs no token
#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

/// Test protected routes reject missing and bad tokens
#[tokio::test]
async fn test_playlists_unauthorized() {
    let app = TestApp::new().await;

    let (status, _) = app.send(Method::GET, "/api/playlists", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/playlists", "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// Test login flow and token usage
#[tokio::test]
async fn test_login_flow() {
    let app = TestApp::new().await;
    let (user, _) = app.create_user("testuser").await;

    let login_body = json!({
        "username": "testuser",
        "password": fixtures::TEST_PASSWORD
    });
    let (status, body) = app
        .send(Method::POST, "/api/auth/login", None, Some(login_body))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["user"]["id"], user.id);

    let access_token = body["accessToken"].as_str().unwrap().to_string();
    let refresh_token = body["refreshToken"].as_str().unwrap().to_string();

    let (status, me) = app.get("/api/me", &access_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "testuser");

    // Refresh tokens are not accepted as access tokens
    let (status, _) = app.get("/api/me", &refresh_token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, refreshed) = app
        .send(
            Method::POST,
            "/api/auth/refresh",
            None,
            Some(json!({ "refreshToken": refresh_token })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(refreshed["accessToken"].as_str().is_some());
}

/// Test wrong password is rejected
#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new().await;
    app.create_user("testuser").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "testuser", "password": "nope" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid username or password");
}

/// Test playlist creation, duplicates and validation
#[tokio::test]
async fn test_create_playlist() {
    let app = TestApp::new().await;
    let (user, token) = app.create_user("alice").await;

    let (status, created) = app
        .post(
            "/api/playlists",
            &token,
            json!({ "name": "Roadtrip", "isPublic": true, "tags": ["Driving", "rock"] }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Roadtrip");
    assert_eq!(created["ownerId"], user.id);
    assert_eq!(created["kind"], "playlist");
    assert_eq!(created["tags"], json!(["driving", "rock"]));

    let (status, body) = app
        .post("/api/playlists", &token, json!({ "name": "Roadtrip" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.get("shareId").is_none());

    let (status, body) = app
        .post("/api/playlists", &token, json!({ "name": "   " }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "name");

    let (status, owned) = app.get("/api/playlists", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(owned.as_array().unwrap().len(), 1);
}

/// Test adding, reordering and removing tracks over HTTP
#[tokio::test]
async fn test_playlist_tracks() {
    let app = TestApp::new().await;
    let (_, token) = app.create_user("alice").await;

    let (_, playlist) = app
        .post("/api/playlists", &token, json!({ "name": "Mix" }))
        .await;
    let id = playlist["id"].as_i64().unwrap();

    let (status, first) = app
        .post(
            &format!("/api/playlists/{id}/tracks"),
            &token,
            json!({ "youtubeId": "aaaaaaaaaaa", "title": "First" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["added"], true);

    // Legacy id resolves through the catalog
    let (_, second) = app
        .post(
            &format!("/api/playlists/{id}/tracks"),
            &token,
            json!({ "id": "rock_001" }),
        )
        .await;
    assert_eq!(second["track"]["artist"], "Queen");

    // Same track again is a no-op
    let (_, again) = app
        .post(
            &format!("/api/playlists/{id}/tracks"),
            &token,
            json!({ "youtubeId": "aaaaaaaaaaa" }),
        )
        .await;
    assert_eq!(again["added"], false);

    let first_id = first["track"]["id"].as_i64().unwrap();
    let second_id = second["track"]["id"].as_i64().unwrap();

    let (status, members) = app
        .send(
            Method::PUT,
            &format!("/api/playlists/{id}/tracks/order"),
            Some(&token),
            Some(json!({ "trackIds": [second_id, first_id] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(members[0]["track"]["id"], second_id);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/playlists/{id}/tracks/{second_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = app.get(&format!("/api/playlists/{id}"), &token).await;
    assert_eq!(detail["tracks"].as_array().unwrap().len(), 1);
}

/// Test a copy share lands in the target's space and cannot repeat
#[tokio::test]
async fn test_share_playlist_copy() {
    let app = TestApp::new().await;
    let (_, alice_token) = app.create_user("alice").await;
    let (bob, bob_token) = app.create_user("bob").await;

    let (_, playlist) = app
        .post(
            "/api/playlists",
            &alice_token,
            json!({ "name": "Roadtrip", "description": "Songs for the drive", "isPublic": true }),
        )
        .await;
    let id = playlist["id"].as_i64().unwrap();
    app.post(
        &format!("/api/playlists/{id}/tracks"),
        &alice_token,
        json!({ "youtubeId": "aaaaaaaaaaa" }),
    )
    .await;

    let share_body = json!({ "targetUserId": bob.id, "shareType": "copy", "message": "enjoy" });
    let (status, outcome) = app
        .post(&format!("/api/playlists/{id}/share"), &alice_token, share_body.clone())
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(outcome["result"], "copied");
    let copy_id = outcome["collectionId"].as_i64().unwrap();

    let (_, copy) = app.get(&format!("/api/playlists/{copy_id}"), &bob_token).await;
    assert_eq!(copy["ownerId"], bob.id);
    assert_eq!(copy["isPublic"], false);
    assert_eq!(copy["sourceId"], id);
    assert_eq!(copy["description"], "Songs for the drive (Shared by alice)");
    assert_eq!(copy["tracks"].as_array().unwrap().len(), 1);

    let (status, conflict) = app
        .post(&format!("/api/playlists/{id}/share"), &alice_token, share_body)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(conflict["shareId"].as_i64().is_some());

    let (_, source) = app.get(&format!("/api/playlists/{id}"), &alice_token).await;
    assert_eq!(source["shareCount"], 1);

    let (_, received) = app.get("/api/playlists/shares/received", &bob_token).await;
    assert_eq!(received.as_array().unwrap().len(), 2);
}

/// Test private collections stay hidden from other users
#[tokio::test]
async fn test_private_playlist_forbidden() {
    let app = TestApp::new().await;
    let (_, alice_token) = app.create_user("alice").await;
    let (bob, bob_token) = app.create_user("bob").await;

    let (_, playlist) = app
        .post("/api/playlists", &alice_token, json!({ "name": "Secret" }))
        .await;
    let id = playlist["id"].as_i64().unwrap();

    let (status, _) = app.get(&format!("/api/playlists/{id}"), &bob_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            &format!("/api/playlists/{id}/share"),
            &bob_token,
            json!({ "targetUserId": bob.id }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/playlists/9999", &bob_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Test discovery excludes the requester's own collections
#[tokio::test]
async fn test_discover_excludes_own() {
    let app = TestApp::new().await;
    let (_, alice_token) = app.create_user("alice").await;
    let (_, bob_token) = app.create_user("bob").await;

    app.post(
        "/api/playlists",
        &alice_token,
        json!({ "name": "Alice Jams", "isPublic": true, "tags": ["chill"] }),
    )
    .await;
    app.post(
        "/api/playlists",
        &bob_token,
        json!({ "name": "Bob Jams", "isPublic": true, "tags": ["chill"] }),
    )
    .await;

    let (status, page) = app
        .get("/api/playlists/discover?search=jams&tags=chill,focus", &bob_token)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["hasMore"], false);
    assert_eq!(page["items"][0]["name"], "Alice Jams");
    assert_eq!(page["items"][0]["owner"]["username"], "alice");

    let (_, tags) = app.get("/api/playlists/tags/popular", &bob_token).await;
    assert_eq!(tags[0]["tag"], "chill");
    assert_eq!(tags[0]["count"], 2);
}

/// Test genres are served by the same routes with their own tables
#[tokio::test]
async fn test_genres_route() {
    let app = TestApp::new().await;
    let (_, token) = app.create_user("alice").await;

    let (status, genre) = app
        .post(
            "/api/genres",
            &token,
            json!({ "name": "Chill", "color": "#88ccff", "isPublic": true }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(genre["kind"], "genre");
    assert_eq!(genre["color"], "#88ccff");

    // A playlist may reuse the name
    let (status, _) = app
        .post("/api/playlists", &token, json!({ "name": "Chill" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, playlists) = app.get("/api/playlists", &token).await;
    assert_eq!(playlists.as_array().unwrap().len(), 1);
    assert!(playlists[0]["color"].is_null());
}

/// Test track resolution endpoint
#[tokio::test]
async fn test_resolve_track() {
    let app = TestApp::new().await;
    let (_, token) = app.create_user("alice").await;

    let (status, track) = app
        .post("/api/tracks/resolve", &token, json!({ "youtubeId": "bbbbbbbbbbb" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(track["youtubeId"], "bbbbbbbbbbb");
    assert_eq!(track["title"], "Unknown Track");

    let id = track["id"].as_i64().unwrap();
    let (status, same) = app
        .post("/api/tracks/resolve", &token, json!({ "id": id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(same["id"], id);

    let (status, _) = app.post("/api/tracks/resolve", &token, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/api/tracks/9999", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Test favorites and recently played
#[tokio::test]
async fn test_listening() {
    let app = TestApp::new().await;
    let (_, token) = app.create_user("alice").await;

    let (status, track) = app
        .post("/api/favorites", &token, json!({ "youtubeId": "ccccccccccc" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let track_id = track["id"].as_i64().unwrap();

    let (_, favorites) = app.get("/api/favorites", &token).await;
    assert_eq!(favorites[0]["id"], track_id);

    let (_, removed) = app
        .send(
            Method::DELETE,
            &format!("/api/favorites/{track_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(removed["success"], true);

    app.post("/api/recently-played", &token, json!({ "youtubeId": "ccccccccccc" }))
        .await;
    app.post("/api/recently-played", &token, json!({ "youtubeId": "ddddddddddd" }))
        .await;

    let (_, history) = app.get("/api/recently-played?limit=1", &token).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["youtubeId"], "ddddddddddd");
}

/// Test follows, posts and the feed
#[tokio::test]
async fn test_feed() {
    let app = TestApp::new().await;
    let (alice, alice_token) = app.create_user("alice").await;
    let (bob, bob_token) = app.create_user("bob").await;

    let (status, _) = app
        .post(&format!("/api/users/{}/follow", alice.id), &bob_token, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(&format!("/api/users/{}/follow", bob.id), &bob_token, json!({}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, post) = app
        .post("/api/posts", &alice_token, json!({ "content": "new mix is up" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let post_id = post["id"].as_i64().unwrap();

    let (_, liked) = app
        .post(&format!("/api/posts/{post_id}/like"), &bob_token, json!({}))
        .await;
    assert_eq!(liked["liked"], true);

    let (status, _) = app
        .post(
            &format!("/api/posts/{post_id}/comments"),
            &bob_token,
            json!({ "content": "nice" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, feed) = app.get("/api/feed", &bob_token).await;
    assert_eq!(feed.as_array().unwrap().len(), 1);
    assert_eq!(feed[0]["likeCount"], 1);
    assert_eq!(feed[0]["commentCount"], 1);
    assert_eq!(feed[0]["liked"], true);

    let (_, profile) = app.get(&format!("/api/users/{}", alice.id), &bob_token).await;
    assert_eq!(profile["followerCount"], 1);
    assert_eq!(profile["isFollowing"], true);
    assert!(profile["email"].is_null());

    // Only the author may delete
    let (status, _) = app
        .send(Method::DELETE, &format!("/api/posts/{post_id}"), Some(&bob_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
