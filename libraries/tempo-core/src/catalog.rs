//! Legacy composite track ids
//!
//! Early clients addressed tracks as `"<genre>_<index>"` (e.g. `"rock_002"`),
//! a 1-based position in a static per-genre catalog. Nothing else in the
//! system depends on this module; it sits behind the track resolver and can
//! be removed once stored references have all moved to internal ids.

use std::collections::HashMap;

/// One entry of the legacy catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub youtube_id: String,
    pub title: String,
    pub artist: String,
    pub duration: String,
    pub genre: String,
}

/// Static genre -> ordered entries table
#[derive(Debug, Clone, Default)]
pub struct LegacyCatalog {
    genres: HashMap<String, Vec<CatalogEntry>>,
}

// (genre, youtube id, title, artist, duration)
const BUILTIN: &[(&str, &str, &str, &str, &str)] = &[
    ("pop", "JGwWNGJdvx8", "Shape of You", "Ed Sheeran", "4:24"),
    ("pop", "YQHsXMglC9A", "Hello", "Adele", "6:07"),
    ("pop", "OPf0YbXqDm0", "Uptown Funk", "Mark Ronson ft. Bruno Mars", "4:31"),
    ("pop", "dQw4w9WgXcQ", "Never Gonna Give You Up", "Rick Astley", "3:33"),
    ("rock", "fJ9rUzIMcZQ", "Bohemian Rhapsody", "Queen", "6:00"),
    ("rock", "hTWKbfoikeg", "Smells Like Teen Spirit", "Nirvana", "5:01"),
    ("latin", "kJQP7kiw5Fk", "Despacito", "Luis Fonsi ft. Daddy Yankee", "4:42"),
    ("edm", "60ItHLz5WEA", "Faded", "Alan Walker", "3:32"),
    ("afro", "jipQpjUA_o8", "Essence", "Wizkid ft. Tems", "4:08"),
    ("afro", "421w1j87fEM", "Last Last", "Burna Boy", "2:53"),
];

impl LegacyCatalog {
    /// Catalog shipped with the server
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        for (genre, youtube_id, title, artist, duration) in BUILTIN {
            catalog.push(CatalogEntry {
                youtube_id: (*youtube_id).to_string(),
                title: (*title).to_string(),
                artist: (*artist).to_string(),
                duration: (*duration).to_string(),
                genre: (*genre).to_string(),
            });
        }
        catalog
    }

    /// Append an entry at the end of its genre
    pub fn push(&mut self, entry: CatalogEntry) {
        self.genres
            .entry(entry.genre.to_lowercase())
            .or_default()
            .push(entry);
    }

    /// Resolve a legacy id to its entry
    pub fn lookup(&self, legacy_id: &str) -> Option<&CatalogEntry> {
        let (genre, index) = decode_legacy_id(legacy_id)?;
        self.genres.get(&genre)?.get(index)
    }

    /// Number of entries across all genres
    pub fn len(&self) -> usize {
        self.genres.values().map(Vec::len).sum()
    }

    /// Whether the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split `"<genre>_<index>"` into a lowercase genre and a 0-based index
///
/// The genre is ASCII letters (hyphens allowed inside), the index is
/// decimal digits counted from 1.
pub fn decode_legacy_id(id: &str) -> Option<(String, usize)> {
    let (genre, digits) = id.trim().rsplit_once('_')?;

    let genre_ok = !genre.is_empty()
        && genre.chars().all(|c| c.is_ascii_alphabetic() || c == '-')
        && !genre.starts_with('-')
        && !genre.ends_with('-');
    if !genre_ok || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let position: usize = digits.parse().ok()?;
    let index = position.checked_sub(1)?;
    Some((genre.to_lowercase(), index))
}

/// Whether `id` has the legacy composite shape
pub fn is_legacy_id(id: &str) -> bool {
    decode_legacy_id(id).is_some()
}
