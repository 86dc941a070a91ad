/// Storage-specific errors
use thiserror::Error;

/// Pool and schema errors
///
/// Query-level failures surface as `tempo_core::TempoError` instead.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection error
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for tempo_core::TempoError {
    fn from(err: StorageError) -> Self {
        tempo_core::TempoError::database(err.to_string())
    }
}

/// Whether `err` is a UNIQUE / PRIMARY KEY constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}
