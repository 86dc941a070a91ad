/// Discovery query and result types
use super::collection::Collection;
use super::track::Track;
use super::user::OwnerSummary;
use serde::{Deserialize, Serialize};

/// Default page size for discovery listings
pub const DEFAULT_DISCOVER_LIMIT: u32 = 20;

/// Number of tracks previewed per discovered collection
pub const PREVIEW_TRACK_COUNT: u32 = 3;

/// Sort order for discovery listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscoverSort {
    /// Most shared first
    #[default]
    ShareCount,
    /// Newest first
    CreatedAt,
    /// Alphabetical
    Name,
}

/// Filters and paging for a discovery listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverQuery {
    pub search: Option<String>,
    pub tags: Vec<String>,
    pub sort: DiscoverSort,
    pub limit: u32,
    pub offset: u32,
}

impl Default for DiscoverQuery {
    fn default() -> Self {
        Self {
            search: None,
            tags: Vec::new(),
            sort: DiscoverSort::default(),
            limit: DEFAULT_DISCOVER_LIMIT,
            offset: 0,
        }
    }
}

impl DiscoverQuery {
    /// Trimmed, non-empty search text
    pub fn search_text(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A public collection with preview data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverItem {
    #[serde(flatten)]
    pub collection: Collection,
    pub owner: OwnerSummary,
    pub preview_tracks: Vec<Track>,
    pub track_count: i64,
}

/// One page of discovery results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverPage {
    pub items: Vec<DiscoverItem>,
    pub total: i64,
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
}

impl DiscoverPage {
    /// Assemble a page; `has_more` is `offset + limit < total`
    pub fn new(items: Vec<DiscoverItem>, total: i64, limit: u32, offset: u32) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
            has_more: i64::from(offset) + i64::from(limit) < total,
        }
    }
}

/// Tag frequency across public collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_more_compares_window_end_with_total() {
        assert!(DiscoverPage::new(Vec::new(), 45, 20, 20).has_more);
        assert!(!DiscoverPage::new(Vec::new(), 40, 20, 20).has_more);
        assert!(!DiscoverPage::new(Vec::new(), 0, 20, 0).has_more);
    }

    #[test]
    fn blank_search_is_ignored() {
        let query = DiscoverQuery {
            search: Some("   ".to_string()),
            ..DiscoverQuery::default()
        };
        assert_eq!(query.search_text(), None);
        assert_eq!(query.limit, 20);
        assert_eq!(query.sort, DiscoverSort::ShareCount);
    }
}
