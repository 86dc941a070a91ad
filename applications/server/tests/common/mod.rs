/// Common test utilities and fixtures
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;
use tempo_core::types::{CreateUser, User};
use tempo_server::{api, services::AuthService, state::AppState};
use tower::util::ServiceExt;

/// Test user credentials
pub mod fixtures {
    pub const TEST_PASSWORD: &str = "TestPassword123!";
    pub const TEST_SECRET: &str = "test-secret-key";
}

/// Full router over a throwaway database file
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let database_url = format!("sqlite://{}", db_path.display());

        let pool = tempo_storage::create_pool(&database_url).await.unwrap();
        tempo_storage::run_migrations(&pool).await.unwrap();

        let auth_service = Arc::new(AuthService::new(fixtures::TEST_SECRET.to_string(), 1, 1));
        let app_state = AppState::new(pool.clone(), Arc::clone(&auth_service));

        Self {
            router: api::router(app_state),
            pool,
            auth_service,
            _temp_dir: temp_dir,
        }
    }

    /// Create a user with `fixtures::TEST_PASSWORD` and return an access token for it
    pub async fn create_user(&self, username: &str) -> (User, String) {
        let user = tempo_storage::users::create(
            &self.pool,
            CreateUser {
                username: Some(username.to_string()),
                name: None,
                email: Some(format!("{username}@example.com")),
            },
        )
        .await
        .unwrap();

        let hash = self.auth_service.hash_password(fixtures::TEST_PASSWORD).unwrap();
        tempo_storage::users::set_password_hash(&self.pool, user.id, &hash)
            .await
            .unwrap();

        let token = self.auth_service.create_access_token(&user).unwrap();
        (user, token)
    }

    /// Send a request and decode the JSON body (`Value::Null` when empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }
}
