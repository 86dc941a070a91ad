/// ID types for Tempo entities
///
/// Every entity is keyed by its `SQLite` rowid.

/// User identifier
pub type UserId = i64;

/// Track identifier
pub type TrackId = i64;

/// Playlist or genre identifier (unique per kind)
pub type CollectionId = i64;

/// Share audit record identifier (unique per kind)
pub type ShareId = i64;

/// Post identifier
pub type PostId = i64;

/// Comment identifier
pub type CommentId = i64;
