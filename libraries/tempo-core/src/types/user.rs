/// User domain types
use super::ids::UserId;
use serde::{Deserialize, Serialize};

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Unique handle
    pub username: String,

    /// Display name
    pub name: Option<String>,

    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_url: Option<String>,
    pub verified: bool,

    /// Account creation timestamp
    pub created_at: String,
}

impl User {
    /// Display name, falling back to the username
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }

    /// Public summary for embedding in other payloads
    pub fn summary(&self) -> OwnerSummary {
        OwnerSummary {
            id: self.id,
            name: self.display_name().to_string(),
            username: self.username.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// Data for creating a user
///
/// When `username` is absent one is generated from `name` or `email`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Partial profile update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_url: Option<String>,
}

/// Owner details shown next to a collection or post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub avatar_url: Option<String>,
}
