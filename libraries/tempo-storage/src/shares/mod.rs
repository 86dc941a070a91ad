//! Sharing collections between users
//!
//! Every call writes one audit record. A `copy` share with a target also
//! duplicates the collection into the target's space; anything else only
//! bumps the source's share counter.

use crate::collections::{self, Tables};
use crate::error::is_unique_violation;
use crate::users;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tempo_core::{error::Result, types::*, TempoError};

fn row_to_share(kind: CollectionKind, row: &SqliteRow) -> ShareRecord {
    let share_type: String = row.get("share_type");
    ShareRecord {
        id: row.get("id"),
        kind,
        source_id: row.get("source_id"),
        sharer_id: row.get("sharer_id"),
        target_user_id: row.get("target_user_id"),
        share_type: ShareType::parse(&share_type).unwrap_or_default(),
        message: row.get("message"),
        created_at: row.get("created_at"),
    }
}

fn share_columns(tables: &Tables) -> String {
    format!(
        "s.id, s.{} AS source_id, s.sharer_id, s.target_user_id, s.share_type, s.message, s.created_at",
        tables.fk
    )
}

/// Share a collection
///
/// # Errors
///
/// - `NotFound` for a missing source, sharer or target user
/// - `Forbidden` when the source is private and not the sharer's
/// - `DuplicateName` (with the audit record's id) when the target already
///   owns a collection with the source's name
pub async fn share(pool: &SqlitePool, request: ShareRequest) -> Result<ShareOutcome> {
    let kind = request.kind;

    let source = collections::get_by_id(pool, kind, request.source_id)
        .await?
        .ok_or_else(|| TempoError::not_found(kind.entity(), request.source_id))?;
    if !source.is_visible_to(request.sharer_id) {
        return Err(TempoError::forbidden(format!(
            "{kind} {} is private",
            source.id
        )));
    }
    let sharer = users::require(pool, request.sharer_id).await?;
    if let Some(target_id) = request.target_user_id {
        users::require(pool, target_id).await?;
    }

    let share_id = record(pool, &request).await?;
    tracing::info!(
        %kind,
        source_id = source.id,
        sharer_id = sharer.id,
        target_user_id = ?request.target_user_id,
        share_type = request.share_type.as_str(),
        share_id,
        "recorded share"
    );

    let target_id = match (request.share_type, request.target_user_id) {
        (ShareType::Copy, Some(target_id)) => target_id,
        _ => {
            collections::increment_share_count(pool, kind, source.id).await?;
            return Ok(ShareOutcome::Referenced { share_id });
        }
    };

    if collections::find_by_owner_and_name(pool, kind, target_id, &source.name)
        .await?
        .is_some()
    {
        return Err(duplicate(kind, &source.name, share_id));
    }

    let copy = copy_collection(pool, &source, &sharer, target_id)
        .await
        .map_err(|e| match e {
            TempoError::DuplicateName { kind, name, .. } => TempoError::DuplicateName {
                kind,
                name,
                share_id: Some(share_id),
            },
            other => other,
        })?;

    collections::increment_share_count(pool, kind, source.id).await?;

    Ok(ShareOutcome::Copied {
        share_id,
        collection_id: copy.id,
    })
}

async fn record(pool: &SqlitePool, request: &ShareRequest) -> Result<ShareId> {
    let tables = Tables::of(request.kind);
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO {} ({}, sharer_id, target_user_id, share_type, message)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
        tables.shares, tables.fk
    ))
    .bind(request.source_id)
    .bind(request.sharer_id)
    .bind(request.target_user_id)
    .bind(request.share_type.as_str())
    .bind(&request.message)
    .fetch_one(pool)
    .await?;

    Ok(row.get("id"))
}

/// Duplicate `source` and its member rows into `target_id`'s space
///
/// Collection row and member rows commit together.
async fn copy_collection(
    pool: &SqlitePool,
    source: &Collection,
    sharer: &User,
    target_id: UserId,
) -> Result<Collection> {
    let kind = source.kind;
    let tables = Tables::of(kind);

    let new_collection = CreateCollection {
        kind,
        owner_id: target_id,
        name: source.name.clone(),
        description: Some(shared_description(
            source.description.as_deref(),
            sharer.display_name(),
        )),
        cover_image: source.cover_image.clone(),
        color: source.color.clone(),
        is_public: false,
        tags: source.tags.clone(),
    };

    let mut tx = pool.begin().await?;

    let copy = match collections::insert(&mut *tx, &new_collection, &source.name, Some(source.id))
        .await
    {
        Ok(copy) => copy,
        Err(e) if is_unique_violation(&e) => {
            return Err(TempoError::DuplicateName {
                kind,
                name: source.name.clone(),
                share_id: None,
            });
        }
        Err(e) => return Err(e.into()),
    };

    let copied = sqlx::query(&format!(
        r#"
        INSERT INTO {members} ({fk}, track_id, position)
        SELECT ?, track_id, position FROM {members} WHERE {fk} = ?
        "#,
        members = tables.members,
        fk = tables.fk,
    ))
    .bind(copy.id)
    .bind(source.id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(
        %kind,
        source_id = source.id,
        copy_id = copy.id,
        tracks = copied.rows_affected(),
        "copied collection"
    );

    Ok(copy)
}

fn shared_description(description: Option<&str>, sharer_name: &str) -> String {
    match description.map(str::trim).filter(|d| !d.is_empty()) {
        Some(description) => format!("{description} (Shared by {sharer_name})"),
        None => format!("(Shared by {sharer_name})"),
    }
}

fn duplicate(kind: CollectionKind, name: &str, share_id: ShareId) -> TempoError {
    TempoError::DuplicateName {
        kind,
        name: name.to_string(),
        share_id: Some(share_id),
    }
}

/// Audit records for one collection, newest first (owner only)
pub async fn list_for_collection(
    pool: &SqlitePool,
    kind: CollectionKind,
    id: CollectionId,
    viewer: UserId,
) -> Result<Vec<ShareRecord>> {
    collections::get_owned(pool, kind, id, viewer).await?;

    let tables = Tables::of(kind);
    let rows = sqlx::query(&format!(
        "SELECT {} FROM {} s WHERE s.{} = ? ORDER BY s.id DESC",
        share_columns(&tables),
        tables.shares,
        tables.fk
    ))
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| row_to_share(kind, row)).collect())
}

/// Shares targeted at `user_id`, newest first
pub async fn list_received(
    pool: &SqlitePool,
    kind: CollectionKind,
    user_id: UserId,
) -> Result<Vec<ShareRecord>> {
    let tables = Tables::of(kind);
    let rows = sqlx::query(&format!(
        "SELECT {} FROM {} s WHERE s.target_user_id = ? ORDER BY s.id DESC",
        share_columns(&tables),
        tables.shares
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| row_to_share(kind, row)).collect())
}

/// Number of audit records for a collection
pub async fn count_for_collection(
    pool: &SqlitePool,
    kind: CollectionKind,
    id: CollectionId,
) -> Result<i64> {
    let tables = Tables::of(kind);
    let row = sqlx::query(&format!(
        "SELECT COUNT(*) AS count FROM {} WHERE {} = ?",
        tables.shares, tables.fk
    ))
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(row.get("count"))
}
