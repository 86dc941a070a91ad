//! Browsing other users' public collections

mod filter;

pub use filter::{Clause, Field, Op, Predicate, Value};

use crate::collections::{self, row_to_collection, Tables};
use crate::users;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::collections::HashMap;
use tempo_core::{error::Result, types::*};

/// Default number of tags returned by `popular_tags`
pub const DEFAULT_POPULAR_TAGS: u32 = 20;

fn order_by(sort: DiscoverSort) -> &'static str {
    match sort {
        DiscoverSort::ShareCount => " ORDER BY c.share_count DESC, c.id DESC",
        DiscoverSort::CreatedAt => " ORDER BY c.created_at DESC, c.id DESC",
        DiscoverSort::Name => " ORDER BY c.name COLLATE NOCASE ASC, c.id DESC",
    }
}

/// One page of public collections of `kind` that `requester` does not own
pub async fn discover(
    pool: &SqlitePool,
    kind: CollectionKind,
    requester: UserId,
    query: &DiscoverQuery,
) -> Result<DiscoverPage> {
    let tables = Tables::of(kind);
    let predicate = Predicate::for_discovery(requester, query);
    let from = format!(
        " FROM {} c INNER JOIN users u ON u.id = c.owner_id",
        tables.collections
    );

    let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) AS count");
    count_query.push(&from);
    predicate.push_where(&mut count_query);
    let total: i64 = count_query.build().fetch_one(pool).await?.get("count");

    let mut page_query = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {}, u.name AS owner_name, u.username AS owner_username, u.avatar_url AS owner_avatar_url",
        tables.select_columns()
    ));
    page_query.push(&from);
    predicate.push_where(&mut page_query);
    page_query.push(order_by(query.sort));
    page_query
        .push(" LIMIT ")
        .push_bind(i64::from(query.limit))
        .push(" OFFSET ")
        .push_bind(i64::from(query.offset));

    let rows = page_query.build().fetch_all(pool).await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in &rows {
        let collection = row_to_collection(kind, row);
        let preview_tracks = collections::get_tracks(pool, kind, collection.id, Some(PREVIEW_TRACK_COUNT))
            .await?
            .into_iter()
            .map(|member| member.track)
            .collect();
        let track_count = collections::track_count(pool, kind, collection.id).await?;

        items.push(DiscoverItem {
            owner: users::summary_from_row(row, "owner_"),
            collection,
            preview_tracks,
            track_count,
        });
    }

    tracing::debug!(
        %kind,
        requester,
        total,
        returned = items.len(),
        "discovery page"
    );

    Ok(DiscoverPage::new(items, total, query.limit, query.offset))
}

/// Most used tags across public collections of `kind`
///
/// Ties are broken alphabetically.
pub async fn popular_tags(pool: &SqlitePool, kind: CollectionKind, limit: u32) -> Result<Vec<TagCount>> {
    let tables = Tables::of(kind);
    let rows = sqlx::query(&format!(
        "SELECT tags FROM {} WHERE is_public = 1",
        tables.collections
    ))
    .fetch_all(pool)
    .await?;

    let mut counts: HashMap<String, i64> = HashMap::new();
    for row in &rows {
        for tag in parse_tags(row.get::<Option<String>, _>("tags").as_deref()) {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }

    Ok(rank_tags(counts, limit))
}

fn rank_tags(counts: HashMap<String, i64>, limit: u32) -> Vec<TagCount> {
    let mut ranked: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount { tag, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    ranked.truncate(limit as usize);
    ranked
}
