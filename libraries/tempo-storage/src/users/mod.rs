//! User accounts, profiles and credentials

use crate::error::is_unique_violation;
use rand::Rng;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tempo_core::{error::Result, types::*, TempoError};

/// Longest generated username base
const USERNAME_MAX_LEN: usize = 20;

/// Suffixed attempts after the bare base collides
const USERNAME_RETRIES: usize = 5;

const USER_COLUMNS: &str =
    "id, username, name, email, bio, avatar_url, cover_url, verified, created_at";

pub(crate) fn row_to_user(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        name: row.get("name"),
        email: row.get("email"),
        bio: row.get("bio"),
        avatar_url: row.get("avatar_url"),
        cover_url: row.get("cover_url"),
        verified: row.get::<i64, _>("verified") != 0,
        created_at: row.get("created_at"),
    }
}

/// Summary from `{prefix}id`, `{prefix}name`, `{prefix}username` and
/// `{prefix}avatar_url` columns of a joined row
pub(crate) fn summary_from_row(row: &SqliteRow, prefix: &str) -> OwnerSummary {
    let username: String = row.get(format!("{prefix}username").as_str());
    let name = row
        .get::<Option<String>, _>(format!("{prefix}name").as_str())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| username.clone());

    OwnerSummary {
        id: row.get(format!("{prefix}id").as_str()),
        name,
        username,
        avatar_url: row.get(format!("{prefix}avatar_url").as_str()),
    }
}

/// Create a user, generating a unique username when none is given
///
/// An explicit username that is taken fails with `Validation` on `username`;
/// generated ones retry with a random suffix.
pub async fn create(pool: &SqlitePool, user: CreateUser) -> Result<User> {
    if let Some(username) = user.username.as_deref() {
        let username = username.trim();
        if username.is_empty() {
            return Err(TempoError::validation("username", "must not be empty"));
        }
        return match insert(pool, username, &user).await {
            Ok(created) => Ok(created),
            Err(e) if is_unique_violation(&e) => Err(unique_conflict(pool, username, &user).await),
            Err(e) => Err(e.into()),
        };
    }

    let base = username_base(user.name.as_deref(), user.email.as_deref());
    let mut candidate = base.clone();

    for attempt in 0..=USERNAME_RETRIES {
        match insert(pool, &candidate, &user).await {
            Ok(created) => return Ok(created),
            Err(e) if is_unique_violation(&e) => {
                if email_taken(pool, user.email.as_deref()).await? {
                    return Err(TempoError::validation("email", "already registered"));
                }
                tracing::debug!(candidate, attempt, "username taken, retrying");
                let suffix: u16 = rand::thread_rng().gen_range(1000..10000);
                candidate = format!("{base}{suffix}");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(TempoError::validation(
        "username",
        format!("could not generate a unique username from '{base}'"),
    ))
}

async fn insert(
    pool: &SqlitePool,
    username: &str,
    user: &CreateUser,
) -> std::result::Result<User, sqlx::Error> {
    let row = sqlx::query(&format!(
        "INSERT INTO users (username, name, email) VALUES (?, ?, ?) RETURNING {USER_COLUMNS}"
    ))
    .bind(username)
    .bind(&user.name)
    .bind(&user.email)
    .fetch_one(pool)
    .await?;

    Ok(row_to_user(&row))
}

async fn unique_conflict(pool: &SqlitePool, username: &str, user: &CreateUser) -> TempoError {
    match email_taken(pool, user.email.as_deref()).await {
        Ok(true) => TempoError::validation("email", "already registered"),
        Ok(false) => TempoError::validation("username", format!("'{username}' is taken")),
        Err(e) => e,
    }
}

async fn email_taken(pool: &SqlitePool, email: Option<&str>) -> Result<bool> {
    let Some(email) = email else {
        return Ok(false);
    };
    let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(row.get::<i64, _>("count") > 0)
}

/// Username base from a display name or the local part of an email
pub fn username_base(name: Option<&str>, email: Option<&str>) -> String {
    let source = name
        .filter(|n| !n.trim().is_empty())
        .or_else(|| email.and_then(|e| e.split('@').next()))
        .unwrap_or_default();

    let mut base: String = source
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() || c == '-' || c == '.' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    base = base.trim_matches('_').to_string();
    base.truncate(USERNAME_MAX_LEN);

    if base.is_empty() {
        "user".to_string()
    } else {
        base
    }
}

/// Get user by ID
pub async fn get_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(row_to_user))
}

/// Get user by ID or fail with `NotFound`
pub async fn require(pool: &SqlitePool, id: UserId) -> Result<User> {
    get_by_id(pool, id)
        .await?
        .ok_or_else(|| TempoError::not_found("User", id))
}

/// Get user by username
pub async fn get_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?"))
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(row_to_user))
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY username"))
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(row_to_user).collect())
}

/// Update profile fields that are present
pub async fn update_profile(pool: &SqlitePool, id: UserId, update: UpdateProfile) -> Result<User> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE users SET
            name = COALESCE(?, name),
            bio = COALESCE(?, bio),
            avatar_url = COALESCE(?, avatar_url),
            cover_url = COALESCE(?, cover_url)
        WHERE id = ?
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(&update.name)
    .bind(&update.bio)
    .bind(&update.avatar_url)
    .bind(&update.cover_url)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref()
        .map(row_to_user)
        .ok_or_else(|| TempoError::not_found("User", id))
}

/// Get user's password hash for authentication
///
/// Returns `None` if the user has no credentials.
pub async fn get_password_hash(pool: &SqlitePool, user_id: UserId) -> Result<Option<String>> {
    let row = sqlx::query("SELECT password_hash FROM user_credentials WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.get("password_hash")))
}

/// Create or update user credentials
///
/// `password_hash` must already be hashed.
pub async fn set_password_hash(pool: &SqlitePool, user_id: UserId, password_hash: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO user_credentials (user_id, password_hash, updated_at)
         VALUES (?, ?, datetime('now'))
         ON CONFLICT(user_id)
         DO UPDATE SET password_hash = excluded.password_hash, updated_at = datetime('now')",
    )
    .bind(user_id)
    .bind(password_hash)
    .execute(pool)
    .await?;

    Ok(())
}
