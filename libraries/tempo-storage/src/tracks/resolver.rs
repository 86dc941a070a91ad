//! Track reference resolution
//!
//! Order: internal id, YouTube id, legacy catalog id, then lazy creation.
//! Creation races on the same YouTube id are settled by the UNIQUE
//! constraint: the loser re-reads the winner's row exactly once.

use super::{find_by_youtube_id, get_by_id, insert};
use crate::error::is_unique_violation;
use sqlx::SqlitePool;
use tempo_core::catalog::{is_legacy_id, CatalogEntry, LegacyCatalog};
use tempo_core::{error::Result, types::*, TempoError};

/// Resolve a loose track reference to a canonical track, creating it if needed
///
/// # Errors
///
/// - `InvalidReference` when neither `id` nor `youtubeId` is usable
/// - `NotFound` when the reference names an internal or legacy id that
///   does not exist and carries no YouTube id to create from
/// - `ResolutionFailed` when creation conflicted and the re-read failed
pub async fn resolve(
    pool: &SqlitePool,
    catalog: &LegacyCatalog,
    reference: &TrackReference,
) -> Result<Track> {
    if !reference.has_identifier() {
        return Err(TempoError::InvalidReference(
            "expected an id or youtubeId".to_string(),
        ));
    }

    if let Some(id) = reference.internal_id() {
        if let Some(track) = get_by_id(pool, id).await? {
            return Ok(track);
        }
    }

    for candidate in external_candidates(reference) {
        if let Some(track) = find_by_youtube_id(pool, candidate).await? {
            return Ok(track);
        }
    }

    let legacy = legacy_entry(catalog, reference);
    if let Some(entry) = legacy {
        if let Some(track) = find_by_youtube_id(pool, &entry.youtube_id).await? {
            return Ok(track);
        }
    }

    let Some(new_track) = creation_metadata(reference, catalog) else {
        let id = reference.id().or(reference.youtube_id()).unwrap_or_default();
        return Err(TempoError::not_found("Track", id));
    };

    create_or_fetch(pool, &new_track).await
}

async fn create_or_fetch(pool: &SqlitePool, new_track: &CreateTrack) -> Result<Track> {
    match insert(pool, new_track).await {
        Ok(track) => {
            tracing::debug!(track_id = track.id, youtube_id = %track.youtube_id, "created track");
            Ok(track)
        }
        Err(e) if is_unique_violation(&e) => {
            tracing::warn!(youtube_id = %new_track.youtube_id, "track created concurrently, re-reading");
            match find_by_youtube_id(pool, &new_track.youtube_id).await {
                Ok(Some(track)) => Ok(track),
                Ok(None) => Err(TempoError::ResolutionFailed(format!(
                    "youtube id '{}' conflicted but no row was found",
                    new_track.youtube_id
                ))),
                Err(e) => Err(TempoError::ResolutionFailed(e.to_string())),
            }
        }
        Err(e) => Err(e.into()),
    }
}

fn external_candidates(reference: &TrackReference) -> Vec<&str> {
    let mut candidates = Vec::with_capacity(2);
    candidates.extend(reference.youtube_id());
    if let Some(id) = reference.id() {
        if !candidates.contains(&id) {
            candidates.push(id);
        }
    }
    candidates
}

fn legacy_entry<'c>(catalog: &'c LegacyCatalog, reference: &TrackReference) -> Option<&'c CatalogEntry> {
    reference
        .id()
        .and_then(|id| catalog.lookup(id))
        .or_else(|| reference.youtube_id().and_then(|id| catalog.lookup(id)))
}

/// External key to create under, if any
///
/// An explicit YouTube id is used unless it is itself a catalog key. The loose
/// `id` is only used when it is neither numeric nor legacy-shaped.
fn creation_key<'a>(
    reference: &'a TrackReference,
    catalog: &'a LegacyCatalog,
    legacy: Option<&'a CatalogEntry>,
) -> Option<&'a str> {
    reference
        .youtube_id()
        .filter(|id| catalog.lookup(id).is_none())
        .or(legacy.map(|entry| entry.youtube_id.as_str()))
        .or_else(|| {
            reference
                .id()
                .filter(|id| id.parse::<i64>().is_err() && !is_legacy_id(id))
        })
}

fn creation_metadata(reference: &TrackReference, catalog: &LegacyCatalog) -> Option<CreateTrack> {
    let legacy = legacy_entry(catalog, reference);
    let youtube_id = creation_key(reference, catalog, legacy)?;
    let mut track = CreateTrack::placeholder(youtube_id);

    if let Some(entry) = legacy {
        track.title.clone_from(&entry.title);
        track.artist.clone_from(&entry.artist);
        track.duration = Some(entry.duration.clone());
        track.genre = Some(entry.genre.clone());
    }

    if let Some(title) = non_blank(reference.title.as_deref()) {
        track.title = title.to_string();
    }
    if let Some(artist) = non_blank(reference.artist.as_deref()) {
        track.artist = artist.to_string();
    }
    if let Some(duration) = non_blank(reference.duration.as_deref()) {
        track.duration = Some(duration.to_string());
    }
    if let Some(thumbnail) = non_blank(reference.thumbnail.as_deref()) {
        track.thumbnail = thumbnail.to_string();
    }
    if let Some(genre) = non_blank(reference.genre.as_deref()) {
        track.genre = Some(genre.to_string());
    }

    Some(track)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(id: Option<&str>, youtube_id: Option<&str>) -> TrackReference {
        TrackReference {
            id: id.map(str::to_string),
            youtube_id: youtube_id.map(str::to_string),
            ..TrackReference::default()
        }
    }

    #[test]
    fn numeric_id_is_never_a_creation_key() {
        let catalog = LegacyCatalog::builtin();
        assert!(creation_metadata(&reference(Some("42"), None), &catalog).is_none());
    }

    #[test]
    fn legacy_shaped_youtube_id_is_a_creation_key() {
        let catalog = LegacyCatalog::builtin();
        let track = creation_metadata(&reference(None, Some("Abcdefgh_12")), &catalog).unwrap();
        assert_eq!(track.youtube_id, "Abcdefgh_12");
        assert_eq!(track.title, UNKNOWN_TITLE);

        // A loose id of the same shape is a catalog key, not a YouTube id
        assert!(creation_metadata(&reference(Some("Abcdefgh_12"), None), &catalog).is_none());
    }

    #[test]
    fn catalog_key_in_youtube_id_creates_under_entry() {
        let catalog = LegacyCatalog::builtin();
        let track = creation_metadata(&reference(None, Some("rock_002")), &catalog).unwrap();
        assert_eq!(track.youtube_id, "hTWKbfoikeg");
        assert_eq!(track.artist, "Nirvana");
    }

    #[test]
    fn explicit_youtube_id_wins_over_catalog() {
        let catalog = LegacyCatalog::builtin();
        let r = reference(Some("rock_001"), Some("abc"));
        let track = creation_metadata(&r, &catalog).unwrap();
        assert_eq!(track.youtube_id, "abc");
        assert_eq!(track.title, "Bohemian Rhapsody");
    }

    #[test]
    fn reference_metadata_overrides_sentinels() {
        let mut r = reference(None, Some("xyz"));
        r.title = Some("Song".to_string());
        r.duration = Some(" ".to_string());
        let track = creation_metadata(&r, &LegacyCatalog::default()).unwrap();
        assert_eq!(track.title, "Song");
        assert_eq!(track.artist, UNKNOWN_ARTIST);
        assert_eq!(track.duration.as_deref(), Some(UNKNOWN_DURATION));
        assert_eq!(track.thumbnail, placeholder_thumbnail("xyz"));
    }

    #[test]
    fn candidates_are_deduplicated() {
        assert_eq!(external_candidates(&reference(Some("a"), Some("a"))), vec!["a"]);
        assert_eq!(external_candidates(&reference(Some("1"), Some("b"))), vec!["b", "1"]);
    }

    async fn test_pool() -> (SqlitePool, tempfile::TempDir) {
        let temp_dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
        let pool = crate::create_pool(&url).await.unwrap();
        crate::run_migrations(&pool).await.unwrap();
        (pool, temp_dir)
    }

    #[tokio::test]
    async fn conflicting_create_returns_existing_row() {
        let (pool, _temp_dir) = test_pool().await;

        let mut winner = CreateTrack::placeholder("raceRace001");
        winner.title = "First writer".to_string();
        let existing = insert(&pool, &winner).await.unwrap();

        let loser = CreateTrack::placeholder("raceRace001");
        let track = create_or_fetch(&pool, &loser).await.unwrap();

        assert_eq!(track.id, existing.id);
        assert_eq!(track.title, "First writer");
        assert_eq!(super::super::count(&pool).await.unwrap(), 1);
    }
}
