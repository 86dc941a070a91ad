/// Core error types for Tempo
use crate::types::{CollectionKind, ShareId};
use thiserror::Error;

/// Result type alias using `TempoError`
pub type Result<T> = std::result::Result<T, TempoError>;

/// Core error type for Tempo
#[derive(Error, Debug)]
pub enum TempoError {
    /// No acting user identity
    #[error("Unauthorized")]
    Unauthorized,

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Acting user lacks rights over the resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The owner already has a collection of this kind with the same name.
    ///
    /// `share_id` is set when a share audit record was written before the
    /// copy was abandoned.
    #[error("A {kind} named '{name}' already exists")]
    DuplicateName {
        kind: CollectionKind,
        name: String,
        share_id: Option<ShareId>,
    },

    /// Track reference carries nothing usable
    #[error("Invalid track reference: {0}")]
    InvalidReference(String),

    /// Track creation conflicted and the follow-up lookup failed too
    #[error("Track resolution failed: {0}")]
    ResolutionFailed(String),

    /// Field-level validation failure
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl TempoError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create a validation error for a single field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for TempoError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
