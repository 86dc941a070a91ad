mod collection;
mod discovery;
mod ids;
mod share;
mod social;
mod track;
mod user;

pub use collection::{
    normalize_tags, parse_tags, Collection, CollectionKind, CollectionTrack, CreateCollection,
    UpdateCollection,
};
pub use discovery::{
    DiscoverItem, DiscoverPage, DiscoverQuery, DiscoverSort, TagCount, DEFAULT_DISCOVER_LIMIT,
    PREVIEW_TRACK_COUNT,
};
pub use ids::{CollectionId, CommentId, PostId, ShareId, TrackId, UserId};
pub use share::{ShareOutcome, ShareRecord, ShareRequest, ShareType};
pub use social::{Comment, CreatePost, FollowEdge, Post};
pub use track::{
    placeholder_thumbnail, watch_url, CreateTrack, Track, TrackReference, UNKNOWN_ARTIST,
    UNKNOWN_DURATION, UNKNOWN_TITLE,
};
pub use user::{CreateUser, OwnerSummary, UpdateProfile, User};
