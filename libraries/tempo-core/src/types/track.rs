/// Track domain types
use super::ids::TrackId;
use serde::{Deserialize, Serialize};

/// Title used when nothing better is known
pub const UNKNOWN_TITLE: &str = "Unknown Track";

/// Artist used when nothing better is known
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Duration used when nothing better is known
pub const UNKNOWN_DURATION: &str = "0:00";

/// Canonical playable item, deduplicated by YouTube id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,
    pub youtube_id: String,
    pub title: String,
    pub artist: String,
    pub genre: Option<String>,
    pub thumbnail: String,
    /// `m:ss` display duration
    pub duration: Option<String>,
    pub release_year: Option<i32>,
    pub youtube_url: String,
    pub created_at: String,
}

/// Data for inserting a new track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTrack {
    pub youtube_id: String,
    pub title: String,
    pub artist: String,
    pub genre: Option<String>,
    pub thumbnail: String,
    pub duration: Option<String>,
    pub release_year: Option<i32>,
    pub youtube_url: String,
}

impl CreateTrack {
    /// Build a track with sentinel metadata for the given YouTube id
    pub fn placeholder(youtube_id: impl Into<String>) -> Self {
        let youtube_id = youtube_id.into();
        Self {
            title: UNKNOWN_TITLE.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
            genre: None,
            thumbnail: placeholder_thumbnail(&youtube_id),
            duration: Some(UNKNOWN_DURATION.to_string()),
            release_year: None,
            youtube_url: watch_url(&youtube_id),
            youtube_id,
        }
    }
}

/// Loosely-specified reference to a track, as sent by clients
///
/// `id` may be an internal id, a YouTube id or a legacy `"<genre>_<index>"` id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackReference {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub youtube_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

impl TrackReference {
    /// Reference a track by internal id
    pub fn from_id(id: TrackId) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Self::default()
        }
    }

    /// Reference a track by YouTube id
    pub fn from_youtube_id(youtube_id: impl Into<String>) -> Self {
        Self {
            youtube_id: Some(youtube_id.into()),
            ..Self::default()
        }
    }

    /// Trimmed, non-empty `id`
    pub fn id(&self) -> Option<&str> {
        non_blank(self.id.as_deref())
    }

    /// Trimmed, non-empty `youtube_id`
    pub fn youtube_id(&self) -> Option<&str> {
        non_blank(self.youtube_id.as_deref())
    }

    /// Whether the reference carries any identifying field
    pub fn has_identifier(&self) -> bool {
        self.id().is_some() || self.youtube_id().is_some()
    }

    /// Internal id, when `id` is numeric
    pub fn internal_id(&self) -> Option<TrackId> {
        self.id().and_then(|id| id.parse().ok())
    }
}

/// Deterministic thumbnail URL for a YouTube id
pub fn placeholder_thumbnail(youtube_id: &str) -> String {
    format!("https://img.youtube.com/vi/{youtube_id}/hqdefault.jpg")
}

/// Watch URL for a YouTube id
pub fn watch_url(youtube_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={youtube_id}")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// Clients send ids both as JSON strings and numbers.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
