//! Tempo Storage
//!
//! Multi-user `SQLite` entity store for Tempo.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each feature owns its own queries and logic
//! - **Statement-level safety**: No in-process locks; correctness relies on
//!   UNIQUE constraints, atomic counter updates and short transactions
//! - **Playlists and genres share code**: every collection operation takes a
//!   `CollectionKind` and picks its tables from it
//!
//! # Example
//!
//! ```rust,no_run
//! use tempo_core::catalog::LegacyCatalog;
//! use tempo_core::types::TrackReference;
//! use tempo_storage::{create_pool, run_migrations, tracks};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://tempo.db").await?;
//! run_migrations(&pool).await?;
//!
//! let catalog = LegacyCatalog::builtin();
//! let track = tracks::resolve(&pool, &catalog, &TrackReference::from_youtube_id("dQw4w9WgXcQ")).await?;
//! println!("{} - {}", track.artist, track.title);
//! # Ok(())
//! # }
//! ```

mod error;

// Vertical slices
pub mod collections;
pub mod discovery;
pub mod listening;
pub mod shares;
pub mod social;
pub mod tracks;
pub mod users;

pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://tempo.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "creating sqlite pool");

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

    tracing::info!("sqlite pool ready");

    Ok(pool)
}
