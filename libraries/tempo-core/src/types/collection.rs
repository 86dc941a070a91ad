//! Playlists and genres
//!
//! Both are user-owned, ordered sets of tracks with the same lifecycle, so
//! they share one `Collection` type discriminated by `CollectionKind`.

use super::ids::{CollectionId, TrackId, UserId};
use super::track::Track;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which collection table a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// User playlist
    Playlist,
    /// User-curated genre
    Genre,
}

impl CollectionKind {
    /// Lowercase name, as used in messages and query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Playlist => "playlist",
            CollectionKind::Genre => "genre",
        }
    }

    /// Capitalised entity name for not-found errors
    pub fn entity(&self) -> &'static str {
        match self {
            CollectionKind::Playlist => "Playlist",
            CollectionKind::Genre => "Genre",
        }
    }

    /// Parse from the lowercase name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "playlist" => Some(CollectionKind::Playlist),
            "genre" => Some(CollectionKind::Genre),
            _ => None,
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Playlist or genre
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: CollectionId,
    pub kind: CollectionKind,
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    /// Only meaningful for genres
    pub color: Option<String>,
    pub is_public: bool,
    pub share_count: i64,
    /// Collection this one was copied from
    pub source_id: Option<CollectionId>,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,

    /// Member tracks (optional, populated when requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<CollectionTrack>>,
}

impl Collection {
    /// Whether `user_id` may view this collection
    pub fn is_visible_to(&self, user_id: UserId) -> bool {
        self.is_public || self.owner_id == user_id
    }
}

/// Data for creating a new collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCollection {
    pub kind: CollectionKind,
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub color: Option<String>,
    pub is_public: bool,
    pub tags: Vec<String>,
}

impl CreateCollection {
    /// Private, untagged collection with only a name
    pub fn new(kind: CollectionKind, owner_id: UserId, name: impl Into<String>) -> Self {
        Self {
            kind,
            owner_id,
            name: name.into(),
            description: None,
            cover_image: None,
            color: None,
            is_public: false,
            tags: Vec::new(),
        }
    }
}

/// Partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollection {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub color: Option<String>,
    pub is_public: Option<bool>,
    pub tags: Option<Vec<String>>,
}

/// Track in a collection with its position
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionTrack {
    pub track_id: TrackId,
    pub order: i64,
    pub added_at: String,
    pub track: Track,
}

/// Normalise a tag list: trimmed, lowercase, non-empty, first occurrence wins
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Parse a stored tag list; malformed or missing values read as no tags
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default()
}
