/// Social graph types
use super::ids::{CollectionId, CommentId, PostId, UserId};
use super::user::OwnerSummary;
use serde::{Deserialize, Serialize};

/// Feed post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub author: OwnerSummary,
    pub content: String,
    pub playlist_id: Option<CollectionId>,
    pub genre_id: Option<CollectionId>,
    pub like_count: i64,
    pub comment_count: i64,
    /// Whether the viewing user liked this post
    pub liked: bool,
    pub created_at: String,
}

/// Data for creating a post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    pub content: String,
    pub playlist_id: Option<CollectionId>,
    pub genre_id: Option<CollectionId>,
}

/// Comment on a post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author: OwnerSummary,
    pub content: String,
    pub created_at: String,
}

/// One side of a follow relationship
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowEdge {
    pub user: OwnerSummary,
    pub since: String,
}
