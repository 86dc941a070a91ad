//! Follows, posts, likes and comments

use crate::collections;
use crate::users::{self, summary_from_row};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tempo_core::{error::Result, types::*, TempoError};

const POST_SELECT: &str = r#"
    SELECT p.id, p.content, p.playlist_id, p.genre_id, p.created_at,
           u.id AS author_id, u.name AS author_name, u.username AS author_username,
           u.avatar_url AS author_avatar_url,
           (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
           (SELECT COUNT(*) FROM comments cm WHERE cm.post_id = p.id) AS comment_count,
           EXISTS (SELECT 1 FROM likes l WHERE l.post_id = p.id AND l.user_id = ?) AS liked
    FROM posts p
    INNER JOIN users u ON u.id = p.author_id
"#;

fn row_to_post(row: &SqliteRow) -> Post {
    Post {
        id: row.get("id"),
        author: summary_from_row(row, "author_"),
        content: row.get("content"),
        playlist_id: row.get("playlist_id"),
        genre_id: row.get("genre_id"),
        like_count: row.get("like_count"),
        comment_count: row.get("comment_count"),
        liked: row.get::<i64, _>("liked") != 0,
        created_at: row.get("created_at"),
    }
}

fn row_to_comment(row: &SqliteRow) -> Comment {
    Comment {
        id: row.get("id"),
        post_id: row.get("post_id"),
        author: summary_from_row(row, "author_"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}

fn row_to_edge(row: &SqliteRow) -> FollowEdge {
    FollowEdge {
        user: summary_from_row(row, "user_"),
        since: row.get("since"),
    }
}

fn required_content(content: &str) -> Result<&str> {
    let content = content.trim();
    if content.is_empty() {
        return Err(TempoError::validation("content", "is required"));
    }
    Ok(content)
}

// ===== Follows =====

/// Follow a user; following twice is a no-op
pub async fn follow(pool: &SqlitePool, follower_id: UserId, following_id: UserId) -> Result<()> {
    if follower_id == following_id {
        return Err(TempoError::validation("userId", "cannot follow yourself"));
    }
    users::require(pool, following_id).await?;

    sqlx::query(
        "INSERT INTO follows (follower_id, following_id) VALUES (?, ?)
         ON CONFLICT(follower_id, following_id) DO NOTHING",
    )
    .bind(follower_id)
    .bind(following_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Stop following a user
///
/// Returns whether a follow existed.
pub async fn unfollow(pool: &SqlitePool, follower_id: UserId, following_id: UserId) -> Result<bool> {
    if follower_id == following_id {
        return Err(TempoError::validation("userId", "cannot unfollow yourself"));
    }

    let result = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND following_id = ?")
        .bind(follower_id)
        .bind(following_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Users following `user_id`, newest first
pub async fn followers(pool: &SqlitePool, user_id: UserId) -> Result<Vec<FollowEdge>> {
    users::require(pool, user_id).await?;

    let rows = sqlx::query(
        r#"
        SELECT u.id AS user_id, u.name AS user_name, u.username AS user_username,
               u.avatar_url AS user_avatar_url, f.created_at AS since
        FROM follows f
        INNER JOIN users u ON u.id = f.follower_id
        WHERE f.following_id = ?
        ORDER BY f.created_at DESC, u.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_edge).collect())
}

/// Users `user_id` follows, newest first
pub async fn following(pool: &SqlitePool, user_id: UserId) -> Result<Vec<FollowEdge>> {
    users::require(pool, user_id).await?;

    let rows = sqlx::query(
        r#"
        SELECT u.id AS user_id, u.name AS user_name, u.username AS user_username,
               u.avatar_url AS user_avatar_url, f.created_at AS since
        FROM follows f
        INNER JOIN users u ON u.id = f.following_id
        WHERE f.follower_id = ?
        ORDER BY f.created_at DESC, u.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_edge).collect())
}

/// Whether `follower_id` follows `following_id`
pub async fn is_following(pool: &SqlitePool, follower_id: UserId, following_id: UserId) -> Result<bool> {
    let row = sqlx::query(
        "SELECT EXISTS (SELECT 1 FROM follows WHERE follower_id = ? AND following_id = ?) AS found",
    )
    .bind(follower_id)
    .bind(following_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<i64, _>("found") != 0)
}

// ===== Posts =====

/// Publish a post, optionally attaching a collection the author can see
pub async fn create_post(pool: &SqlitePool, author_id: UserId, post: CreatePost) -> Result<Post> {
    let content = required_content(&post.content)?;

    if let Some(id) = post.playlist_id {
        collections::get_visible(pool, CollectionKind::Playlist, id, author_id).await?;
    }
    if let Some(id) = post.genre_id {
        collections::get_visible(pool, CollectionKind::Genre, id, author_id).await?;
    }

    let row = sqlx::query(
        "INSERT INTO posts (author_id, content, playlist_id, genre_id) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(author_id)
    .bind(content)
    .bind(post.playlist_id)
    .bind(post.genre_id)
    .fetch_one(pool)
    .await?;

    let id: PostId = row.get("id");
    tracing::debug!(post_id = id, author_id, "created post");

    get_post(pool, id, author_id)
        .await?
        .ok_or_else(|| TempoError::not_found("Post", id))
}

/// Get a post as seen by `viewer`
pub async fn get_post(pool: &SqlitePool, id: PostId, viewer: UserId) -> Result<Option<Post>> {
    let row = sqlx::query(&format!("{POST_SELECT} WHERE p.id = ?"))
        .bind(viewer)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(row_to_post))
}

/// Delete a post (author only)
pub async fn delete_post(pool: &SqlitePool, id: PostId, user_id: UserId) -> Result<()> {
    let author = post_author(pool, id).await?;
    if author != user_id {
        return Err(TempoError::forbidden("only the author can delete this post"));
    }

    sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

async fn post_author(pool: &SqlitePool, id: PostId) -> Result<UserId> {
    let row = sqlx::query("SELECT author_id FROM posts WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| TempoError::not_found("Post", id))?;

    Ok(row.get("author_id"))
}

/// Posts by `user_id` and everyone they follow, newest first
pub async fn feed(pool: &SqlitePool, user_id: UserId, limit: u32, offset: u32) -> Result<Vec<Post>> {
    let rows = sqlx::query(&format!(
        r#"
        {POST_SELECT}
        WHERE p.author_id = ?
           OR p.author_id IN (SELECT following_id FROM follows WHERE follower_id = ?)
        ORDER BY p.created_at DESC, p.id DESC
        LIMIT ? OFFSET ?
        "#
    ))
    .bind(user_id)
    .bind(user_id)
    .bind(user_id)
    .bind(i64::from(limit))
    .bind(i64::from(offset))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_post).collect())
}

/// Like or unlike a post
///
/// Returns the new liked state.
pub async fn toggle_like(pool: &SqlitePool, post_id: PostId, user_id: UserId) -> Result<bool> {
    post_author(pool, post_id).await?;

    let removed = sqlx::query("DELETE FROM likes WHERE user_id = ? AND post_id = ?")
        .bind(user_id)
        .bind(post_id)
        .execute(pool)
        .await?;
    if removed.rows_affected() > 0 {
        return Ok(false);
    }

    sqlx::query(
        "INSERT INTO likes (user_id, post_id) VALUES (?, ?)
         ON CONFLICT(user_id, post_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(true)
}

// ===== Comments =====

/// Comment on a post
pub async fn add_comment(
    pool: &SqlitePool,
    post_id: PostId,
    author_id: UserId,
    content: &str,
) -> Result<Comment> {
    let content = required_content(content)?;
    post_author(pool, post_id).await?;

    let row = sqlx::query(
        "INSERT INTO comments (post_id, author_id, content) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(post_id)
    .bind(author_id)
    .bind(content)
    .fetch_one(pool)
    .await?;
    let id: CommentId = row.get("id");

    let row = sqlx::query(
        r#"
        SELECT c.id, c.post_id, c.content, c.created_at,
               u.id AS author_id, u.name AS author_name, u.username AS author_username,
               u.avatar_url AS author_avatar_url
        FROM comments c
        INNER JOIN users u ON u.id = c.author_id
        WHERE c.id = ?
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(row_to_comment(&row))
}

/// Comments on a post, oldest first
pub async fn list_comments(pool: &SqlitePool, post_id: PostId) -> Result<Vec<Comment>> {
    post_author(pool, post_id).await?;

    let rows = sqlx::query(
        r#"
        SELECT c.id, c.post_id, c.content, c.created_at,
               u.id AS author_id, u.name AS author_name, u.username AS author_username,
               u.avatar_url AS author_avatar_url
        FROM comments c
        INNER JOIN users u ON u.id = c.author_id
        WHERE c.post_id = ?
        ORDER BY c.created_at, c.id
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_comment).collect())
}

/// Delete a comment (comment author only)
pub async fn delete_comment(pool: &SqlitePool, id: CommentId, user_id: UserId) -> Result<()> {
    let row = sqlx::query("SELECT author_id FROM comments WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| TempoError::not_found("Comment", id))?;

    if row.get::<UserId, _>("author_id") != user_id {
        return Err(TempoError::forbidden("only the author can delete this comment"));
    }

    sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
