//! Playlists and genres
//!
//! Both kinds have identical table shapes, so every query here is written
//! once against the table names `Tables::of(kind)` picks.

use crate::error::is_unique_violation;
use crate::tracks::{row_to_track, TRACK_COLUMNS};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor, SqlitePool};
use std::collections::HashSet;
use tempo_core::{error::Result, types::*, TempoError};

/// Table and column names for one collection kind
#[derive(Debug, Clone, Copy)]
pub(crate) struct Tables {
    pub collections: &'static str,
    pub members: &'static str,
    pub shares: &'static str,
    /// Foreign key naming the collection in member and share tables
    pub fk: &'static str,
    pub source_column: &'static str,
}

impl Tables {
    pub(crate) fn of(kind: CollectionKind) -> Self {
        match kind {
            CollectionKind::Playlist => Self {
                collections: "playlists",
                members: "playlist_tracks",
                shares: "playlist_shares",
                fk: "playlist_id",
                source_column: "source_playlist_id",
            },
            CollectionKind::Genre => Self {
                collections: "genres",
                members: "genre_tracks",
                shares: "genre_shares",
                fk: "genre_id",
                source_column: "source_genre_id",
            },
        }
    }

    /// Select list for `row_to_collection`, with the table aliased as `c`
    pub(crate) fn select_columns(&self) -> String {
        self.columns("c.")
    }

    /// Unqualified column list for `RETURNING` clauses
    pub(crate) fn returning_columns(&self) -> String {
        self.columns("")
    }

    fn columns(&self, prefix: &str) -> String {
        format!(
            "{p}id, {p}owner_id, {p}name, {p}description, {p}cover_image, {p}color, {p}is_public, \
             {p}share_count, {p}{source} AS source_id, {p}tags, {p}created_at, {p}updated_at",
            p = prefix,
            source = self.source_column
        )
    }
}

pub(crate) fn row_to_collection(kind: CollectionKind, row: &SqliteRow) -> Collection {
    Collection {
        id: row.get("id"),
        kind,
        owner_id: row.get("owner_id"),
        name: row.get("name"),
        description: row.get("description"),
        cover_image: row.get("cover_image"),
        color: row.get("color"),
        is_public: row.get::<i64, _>("is_public") != 0,
        share_count: row.get("share_count"),
        source_id: row.get("source_id"),
        tags: parse_tags(row.get::<Option<String>, _>("tags").as_deref()),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        tracks: None,
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TempoError::validation("name", "is required"));
    }
    Ok(name.to_string())
}

fn duplicate_name(kind: CollectionKind, name: &str) -> TempoError {
    TempoError::DuplicateName {
        kind,
        name: name.to_string(),
        share_id: None,
    }
}

/// Create new collection
pub async fn create(pool: &SqlitePool, collection: CreateCollection) -> Result<Collection> {
    let kind = collection.kind;
    let name = validate_name(&collection.name)?;

    match insert(pool, &collection, &name, None).await {
        Ok(created) => Ok(created),
        Err(e) if is_unique_violation(&e) => Err(duplicate_name(kind, &name)),
        Err(e) => Err(e.into()),
    }
}

/// Insert a collection row
///
/// Returns the raw `sqlx` error so callers can map name conflicts.
pub(crate) async fn insert<'e, E>(
    executor: E,
    collection: &CreateCollection,
    name: &str,
    source_id: Option<CollectionId>,
) -> std::result::Result<Collection, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let tables = Tables::of(collection.kind);
    let tags = serde_json::to_string(&normalize_tags(&collection.tags))
        .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    let color = match collection.kind {
        CollectionKind::Genre => collection.color.as_deref(),
        CollectionKind::Playlist => None,
    };

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO {table} (owner_id, name, description, cover_image, color, is_public, {source}, tags)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {columns}
        "#,
        table = tables.collections,
        source = tables.source_column,
        columns = tables.returning_columns(),
    ))
    .bind(collection.owner_id)
    .bind(name)
    .bind(&collection.description)
    .bind(&collection.cover_image)
    .bind(color)
    .bind(collection.is_public)
    .bind(source_id)
    .bind(tags)
    .fetch_one(executor)
    .await?;

    Ok(row_to_collection(collection.kind, &row))
}

/// Get collection by ID, without any permission check
pub async fn get_by_id(
    pool: &SqlitePool,
    kind: CollectionKind,
    id: CollectionId,
) -> Result<Option<Collection>> {
    let tables = Tables::of(kind);
    let row = sqlx::query(&format!(
        "SELECT {} FROM {} c WHERE c.id = ?",
        tables.select_columns(),
        tables.collections
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(|row| row_to_collection(kind, row)))
}

/// Get collection if `viewer` may see it (public or owned)
///
/// Fails with `NotFound` or `Forbidden`.
pub async fn get_visible(
    pool: &SqlitePool,
    kind: CollectionKind,
    id: CollectionId,
    viewer: UserId,
) -> Result<Collection> {
    let collection = get_by_id(pool, kind, id)
        .await?
        .ok_or_else(|| TempoError::not_found(kind.entity(), id))?;

    if !collection.is_visible_to(viewer) {
        return Err(TempoError::forbidden(format!("{kind} {id} is private")));
    }
    Ok(collection)
}

/// Get collection owned by `user_id`, failing with `NotFound` or `Forbidden`
pub async fn get_owned(
    pool: &SqlitePool,
    kind: CollectionKind,
    id: CollectionId,
    user_id: UserId,
) -> Result<Collection> {
    let collection = get_by_id(pool, kind, id)
        .await?
        .ok_or_else(|| TempoError::not_found(kind.entity(), id))?;

    if collection.owner_id != user_id {
        return Err(TempoError::forbidden(format!(
            "only the owner can modify {kind} {id}"
        )));
    }
    Ok(collection)
}

/// Get visible collection with all member tracks
pub async fn get_with_tracks(
    pool: &SqlitePool,
    kind: CollectionKind,
    id: CollectionId,
    viewer: UserId,
) -> Result<Collection> {
    let mut collection = get_visible(pool, kind, id, viewer).await?;
    collection.tracks = Some(get_tracks(pool, kind, id, None).await?);
    Ok(collection)
}

/// Collections owned by a user, most recently updated first
pub async fn list_owned(
    pool: &SqlitePool,
    kind: CollectionKind,
    owner_id: UserId,
) -> Result<Vec<Collection>> {
    let tables = Tables::of(kind);
    let rows = sqlx::query(&format!(
        "SELECT {} FROM {} c WHERE c.owner_id = ? ORDER BY c.updated_at DESC, c.id DESC",
        tables.select_columns(),
        tables.collections
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| row_to_collection(kind, row)).collect())
}

/// Find a user's collection by exact name
pub async fn find_by_owner_and_name(
    pool: &SqlitePool,
    kind: CollectionKind,
    owner_id: UserId,
    name: &str,
) -> Result<Option<Collection>> {
    let tables = Tables::of(kind);
    let row = sqlx::query(&format!(
        "SELECT {} FROM {} c WHERE c.owner_id = ? AND c.name = ?",
        tables.select_columns(),
        tables.collections
    ))
    .bind(owner_id)
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(|row| row_to_collection(kind, row)))
}

/// Update the fields that are present (owner only)
pub async fn update(
    pool: &SqlitePool,
    kind: CollectionKind,
    id: CollectionId,
    user_id: UserId,
    update: UpdateCollection,
) -> Result<Collection> {
    get_owned(pool, kind, id, user_id).await?;

    let tables = Tables::of(kind);
    let name = update.name.as_deref().map(validate_name).transpose()?;
    let tags = update
        .tags
        .as_ref()
        .map(|tags| serde_json::to_string(&normalize_tags(tags)))
        .transpose()?;
    let color = match kind {
        CollectionKind::Genre => update.color.as_deref(),
        CollectionKind::Playlist => None,
    };

    let result = sqlx::query(&format!(
        r#"
        UPDATE {table} SET
            name = COALESCE(?, name),
            description = COALESCE(?, description),
            cover_image = COALESCE(?, cover_image),
            color = COALESCE(?, color),
            is_public = COALESCE(?, is_public),
            tags = COALESCE(?, tags),
            updated_at = datetime('now')
        WHERE id = ?
        RETURNING {columns}
        "#,
        table = tables.collections,
        columns = tables.returning_columns(),
    ))
    .bind(&name)
    .bind(&update.description)
    .bind(&update.cover_image)
    .bind(color)
    .bind(update.is_public)
    .bind(tags)
    .bind(id)
    .fetch_optional(pool)
    .await;

    match result {
        Ok(Some(row)) => Ok(row_to_collection(kind, &row)),
        Ok(None) => Err(TempoError::not_found(kind.entity(), id)),
        Err(e) if is_unique_violation(&e) => {
            Err(duplicate_name(kind, name.as_deref().unwrap_or_default()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete collection (owner only); member rows cascade
pub async fn delete(
    pool: &SqlitePool,
    kind: CollectionKind,
    id: CollectionId,
    user_id: UserId,
) -> Result<()> {
    get_owned(pool, kind, id, user_id).await?;

    let tables = Tables::of(kind);
    sqlx::query(&format!("DELETE FROM {} WHERE id = ?", tables.collections))
        .bind(id)
        .execute(pool)
        .await?;

    tracing::debug!(%kind, id, "deleted collection");
    Ok(())
}

/// Append a track at `max(position) + 1` (owner only)
///
/// Returns `false` when the track was already a member.
pub async fn add_track(
    pool: &SqlitePool,
    kind: CollectionKind,
    id: CollectionId,
    track_id: TrackId,
    user_id: UserId,
) -> Result<bool> {
    get_owned(pool, kind, id, user_id).await?;

    let tables = Tables::of(kind);
    let result = sqlx::query(&format!(
        r#"
        INSERT INTO {members} ({fk}, track_id, position)
        SELECT ?, ?, COALESCE(MAX(position), -1) + 1 FROM {members} WHERE {fk} = ?
        ON CONFLICT({fk}, track_id) DO NOTHING
        "#,
        members = tables.members,
        fk = tables.fk,
    ))
    .bind(id)
    .bind(track_id)
    .bind(id)
    .execute(pool)
    .await?;

    touch(pool, kind, id).await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a track and close the gap in positions (owner only)
pub async fn remove_track(
    pool: &SqlitePool,
    kind: CollectionKind,
    id: CollectionId,
    track_id: TrackId,
    user_id: UserId,
) -> Result<()> {
    get_owned(pool, kind, id, user_id).await?;

    let tables = Tables::of(kind);
    let mut tx = pool.begin().await?;

    let removed = sqlx::query(&format!(
        "DELETE FROM {} WHERE {} = ? AND track_id = ?",
        tables.members, tables.fk
    ))
    .bind(id)
    .bind(track_id)
    .execute(&mut *tx)
    .await?;

    if removed.rows_affected() == 0 {
        return Err(TempoError::not_found("Track", track_id));
    }

    // Reorder positions to fill gap
    sqlx::query(&format!(
        r#"
        UPDATE {members}
        SET position = (
            SELECT COUNT(*)
            FROM {members} m2
            WHERE m2.{fk} = {members}.{fk}
              AND m2.position < {members}.position
        )
        WHERE {fk} = ?
        "#,
        members = tables.members,
        fk = tables.fk,
    ))
    .bind(id)
    .execute(&mut *tx)
    .await?;

    touch(&mut *tx, kind, id).await?;
    tx.commit().await?;

    Ok(())
}

/// Reassign all positions from a full ordering of member track ids (owner only)
pub async fn reorder_tracks(
    pool: &SqlitePool,
    kind: CollectionKind,
    id: CollectionId,
    track_ids: &[TrackId],
    user_id: UserId,
) -> Result<()> {
    get_owned(pool, kind, id, user_id).await?;

    let tables = Tables::of(kind);
    let mut tx = pool.begin().await?;

    let current: HashSet<TrackId> = sqlx::query(&format!(
        "SELECT track_id FROM {} WHERE {} = ?",
        tables.members, tables.fk
    ))
    .bind(id)
    .fetch_all(&mut *tx)
    .await?
    .iter()
    .map(|row| row.get("track_id"))
    .collect();

    let requested: HashSet<TrackId> = track_ids.iter().copied().collect();
    if requested.len() != track_ids.len() || requested != current {
        return Err(TempoError::validation(
            "trackIds",
            "must list every member track exactly once",
        ));
    }

    for (position, track_id) in track_ids.iter().enumerate() {
        sqlx::query(&format!(
            "UPDATE {} SET position = ? WHERE {} = ? AND track_id = ?",
            tables.members, tables.fk
        ))
        .bind(position as i64)
        .bind(id)
        .bind(track_id)
        .execute(&mut *tx)
        .await?;
    }

    touch(&mut *tx, kind, id).await?;
    tx.commit().await?;

    Ok(())
}

/// Member tracks by position, optionally only the first `limit`
pub async fn get_tracks(
    pool: &SqlitePool,
    kind: CollectionKind,
    id: CollectionId,
    limit: Option<u32>,
) -> Result<Vec<CollectionTrack>> {
    let tables = Tables::of(kind);
    let rows = sqlx::query(&format!(
        r#"
        SELECT {TRACK_COLUMNS}, m.position, m.added_at
        FROM {members} m
        INNER JOIN tracks t ON m.track_id = t.id
        WHERE m.{fk} = ?
        ORDER BY m.position
        LIMIT ?
        "#,
        members = tables.members,
        fk = tables.fk,
    ))
    .bind(id)
    .bind(limit.map_or(-1, i64::from))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| CollectionTrack {
            track_id: row.get("id"),
            order: row.get("position"),
            added_at: row.get("added_at"),
            track: row_to_track(row),
        })
        .collect())
}

/// Number of member tracks
pub async fn track_count(pool: &SqlitePool, kind: CollectionKind, id: CollectionId) -> Result<i64> {
    let tables = Tables::of(kind);
    let row = sqlx::query(&format!(
        "SELECT COUNT(*) AS count FROM {} WHERE {} = ?",
        tables.members, tables.fk
    ))
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(row.get("count"))
}

/// Atomically bump `share_count` by one
pub async fn increment_share_count<'e, E>(
    executor: E,
    kind: CollectionKind,
    id: CollectionId,
) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    let tables = Tables::of(kind);
    sqlx::query(&format!(
        "UPDATE {} SET share_count = share_count + 1 WHERE id = ?",
        tables.collections
    ))
    .bind(id)
    .execute(executor)
    .await?;

    Ok(())
}

async fn touch<'e, E>(executor: E, kind: CollectionKind, id: CollectionId) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    let tables = Tables::of(kind);
    sqlx::query(&format!(
        "UPDATE {} SET updated_at = datetime('now') WHERE id = ?",
        tables.collections
    ))
    .bind(id)
    .execute(executor)
    .await?;

    Ok(())
}
