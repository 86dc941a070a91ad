//! Favorites and listening history
//!
//! Both take loose track references and resolve them first, so clients can
//! favorite or play a track the server has never seen.

use crate::tracks::{self, row_to_track, TRACK_COLUMNS};
use sqlx::SqlitePool;
use tempo_core::catalog::LegacyCatalog;
use tempo_core::{error::Result, types::*};

/// Default number of plays kept per user
pub const DEFAULT_RECENTLY_PLAYED_CAP: u32 = 50;

/// Favorite a track; favoriting twice is a no-op
pub async fn add_favorite(
    pool: &SqlitePool,
    catalog: &LegacyCatalog,
    user_id: UserId,
    reference: &TrackReference,
) -> Result<Track> {
    let track = tracks::resolve(pool, catalog, reference).await?;

    sqlx::query(
        "INSERT INTO user_favorites (user_id, track_id) VALUES (?, ?)
         ON CONFLICT(user_id, track_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(track.id)
    .execute(pool)
    .await?;

    Ok(track)
}

/// Remove a favorite
///
/// Returns whether the track was a favorite.
pub async fn remove_favorite(pool: &SqlitePool, user_id: UserId, track_id: TrackId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM user_favorites WHERE user_id = ? AND track_id = ?")
        .bind(user_id)
        .bind(track_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Favorite tracks, most recently added first
pub async fn list_favorites(pool: &SqlitePool, user_id: UserId) -> Result<Vec<Track>> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {TRACK_COLUMNS}
        FROM user_favorites f
        INNER JOIN tracks t ON t.id = f.track_id
        WHERE f.user_id = ?
        ORDER BY f.rowid DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_track).collect())
}

/// Record a play and keep only the newest `cap` entries
///
/// Replaying a track moves it to the front rather than duplicating it.
pub async fn record_play(
    pool: &SqlitePool,
    catalog: &LegacyCatalog,
    user_id: UserId,
    reference: &TrackReference,
    cap: u32,
) -> Result<Track> {
    let track = tracks::resolve(pool, catalog, reference).await?;

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM recently_played WHERE user_id = ? AND track_id = ?")
        .bind(user_id)
        .bind(track.id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("INSERT INTO recently_played (user_id, track_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(track.id)
        .execute(&mut *tx)
        .await?;

    let trimmed = sqlx::query(
        r#"
        DELETE FROM recently_played
        WHERE user_id = ?
          AND rowid NOT IN (
              SELECT rowid FROM recently_played
              WHERE user_id = ?
              ORDER BY rowid DESC
              LIMIT ?
          )
        "#,
    )
    .bind(user_id)
    .bind(user_id)
    .bind(i64::from(cap))
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    if trimmed.rows_affected() > 0 {
        tracing::debug!(user_id, trimmed = trimmed.rows_affected(), "trimmed listening history");
    }

    Ok(track)
}

/// Recently played tracks, newest first
pub async fn recently_played(pool: &SqlitePool, user_id: UserId, limit: u32) -> Result<Vec<Track>> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {TRACK_COLUMNS}
        FROM recently_played r
        INNER JOIN tracks t ON t.id = r.track_id
        WHERE r.user_id = ?
        ORDER BY r.rowid DESC
        LIMIT ?
        "#
    ))
    .bind(user_id)
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_track).collect())
}
