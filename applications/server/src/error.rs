/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tempo_core::TempoError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Domain(#[from] TempoError),

    #[error("Storage error: {0}")]
    Storage(#[from] tempo_storage::StorageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

fn domain_response(err: TempoError) -> (StatusCode, serde_json::Value) {
    let message = err.to_string();
    match err {
        TempoError::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            json!({ "error": "Not authenticated" }),
        ),
        TempoError::NotFound { .. } => (StatusCode::NOT_FOUND, json!({ "error": message })),
        TempoError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
        TempoError::DuplicateName { share_id, .. } => {
            let mut body = json!({ "error": message });
            if let Some(share_id) = share_id {
                body["shareId"] = json!(share_id);
            }
            (StatusCode::CONFLICT, body)
        }
        TempoError::Validation { field, .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": message, "field": field }),
        ),
        TempoError::InvalidReference(_) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
        TempoError::ResolutionFailed(_) => {
            tracing::error!("Track resolution failed: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Could not resolve track" }),
            )
        }
        TempoError::Database(_) | TempoError::Serialization(_) | TempoError::Other(_) => {
            tracing::error!("Database error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Database error" }),
            )
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServerError::Auth(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ServerError::Domain(err) => domain_response(err),
            ServerError::Storage(ref e) => {
                tracing::error!("Storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Storage error" }),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Configuration error" }),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
            ServerError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "IO error" }),
                )
            }
            ServerError::Jwt(ref e) => {
                tracing::warn!("JWT error: {:?}", e);
                (StatusCode::UNAUTHORIZED, json!({ "error": "Invalid token" }))
            }
            ServerError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Password error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_core::types::CollectionKind;

    #[test]
    fn duplicate_name_carries_share_id() {
        let (status, body) = domain_response(TempoError::DuplicateName {
            kind: CollectionKind::Playlist,
            name: "Roadtrip".to_string(),
            share_id: Some(12),
        });
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["shareId"], 12);
        assert_eq!(body["error"], "A playlist named 'Roadtrip' already exists");
    }

    #[test]
    fn validation_names_the_field() {
        let (status, body) = domain_response(TempoError::validation("name", "is required"));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "name");
    }

    #[test]
    fn database_errors_are_generic() {
        let (status, body) = domain_response(TempoError::database("disk I/O error at /var/db"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Database error");
    }
}
