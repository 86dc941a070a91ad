//! Tempo Core
//!
//! Platform-agnostic domain types and error handling for Tempo, a social
//! music-discovery service.
//!
//! This crate has no I/O. Storage and HTTP layers build on the types here.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Collection` (playlists and genres), `ShareRecord`,
//!   `User`, social entities and discovery results
//! - **Legacy Catalog**: decoding of `"<genre>_<index>"` track ids
//! - **Error Handling**: Unified `TempoError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use tempo_core::catalog::LegacyCatalog;
//! use tempo_core::types::{CollectionKind, TrackReference};
//!
//! let catalog = LegacyCatalog::builtin();
//! let entry = catalog.lookup("rock_001").expect("builtin entry");
//! assert_eq!(entry.artist, "Queen");
//!
//! let reference = TrackReference::from_youtube_id("dQw4w9WgXcQ");
//! assert!(reference.has_identifier());
//! assert_eq!(CollectionKind::Genre.as_str(), "genre");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{Result, TempoError};

pub use types::{
    // Collections
    Collection, CollectionId, CollectionKind, CollectionTrack, CreateCollection, UpdateCollection,
    // Sharing
    ShareId, ShareOutcome, ShareRecord, ShareRequest, ShareType,
    // Tracks
    CreateTrack, Track, TrackId, TrackReference,
    // Users
    CreateUser, OwnerSummary, UpdateProfile, User, UserId,
    // Discovery
    DiscoverItem, DiscoverPage, DiscoverQuery, DiscoverSort, TagCount,
};
