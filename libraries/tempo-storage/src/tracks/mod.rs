//! Canonical tracks
//!
//! Tracks are never created directly by clients; `resolve` turns whatever
//! reference a client sends into a canonical row, creating it on first use.

mod resolver;

pub use resolver::resolve;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor, SqlitePool};
use tempo_core::{error::Result, types::*};

pub(crate) const TRACK_COLUMNS: &str =
    "t.id, t.youtube_id, t.title, t.artist, t.genre, t.thumbnail, t.duration, t.release_year, t.youtube_url, t.created_at";

pub(crate) fn row_to_track(row: &SqliteRow) -> Track {
    Track {
        id: row.get("id"),
        youtube_id: row.get("youtube_id"),
        title: row.get("title"),
        artist: row.get("artist"),
        genre: row.get("genre"),
        thumbnail: row.get("thumbnail"),
        duration: row.get("duration"),
        release_year: row.get::<Option<i64>, _>("release_year").map(|y| y as i32),
        youtube_url: row.get("youtube_url"),
        created_at: row.get("created_at"),
    }
}

/// Get track by internal ID
pub async fn get_by_id(pool: &SqlitePool, id: TrackId) -> Result<Option<Track>> {
    let row = sqlx::query(&format!("SELECT {TRACK_COLUMNS} FROM tracks t WHERE t.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(row_to_track))
}

/// Get track by YouTube ID
pub async fn get_by_youtube_id(pool: &SqlitePool, youtube_id: &str) -> Result<Option<Track>> {
    Ok(find_by_youtube_id(pool, youtube_id).await?)
}

pub(crate) async fn find_by_youtube_id<'e, E>(
    executor: E,
    youtube_id: &str,
) -> std::result::Result<Option<Track>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query(&format!(
        "SELECT {TRACK_COLUMNS} FROM tracks t WHERE t.youtube_id = ?"
    ))
    .bind(youtube_id)
    .fetch_optional(executor)
    .await?;

    Ok(row.as_ref().map(row_to_track))
}

/// Insert a new track
///
/// Returns the raw `sqlx` error so callers can tell a YouTube id conflict
/// apart from other failures.
pub(crate) async fn insert(
    pool: &SqlitePool,
    track: &CreateTrack,
) -> std::result::Result<Track, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO tracks (youtube_id, title, artist, genre, thumbnail, duration, release_year, youtube_url)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id, youtube_id, title, artist, genre, thumbnail, duration, release_year, youtube_url, created_at
        "#,
    )
    .bind(&track.youtube_id)
    .bind(&track.title)
    .bind(&track.artist)
    .bind(&track.genre)
    .bind(&track.thumbnail)
    .bind(&track.duration)
    .bind(track.release_year)
    .bind(&track.youtube_url)
    .fetch_one(pool)
    .await?;

    Ok(row_to_track(&row))
}

/// Create a new track
pub async fn create(pool: &SqlitePool, track: CreateTrack) -> Result<Track> {
    Ok(insert(pool, &track).await?)
}

/// Total number of tracks
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM tracks")
        .fetch_one(pool)
        .await?;
    Ok(row.get("count"))
}
