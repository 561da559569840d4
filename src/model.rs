//! API-facing catalog shapes.

use serde::{Deserialize, Serialize};

/// Normalized video, built fresh from a shard record on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// Positional id, `"{shard}-{position}"`.
    pub id: String,
    pub title: String,
    /// First thumbnail URL, empty if the record has none.
    pub thumbnail: String,
    pub thumbnails: Vec<String>,
    /// Player URL pulled out of the embed markup. Empty when unavailable.
    pub embed_url: String,
    /// `m:ss`
    pub duration: String,
    pub duration_seconds: u64,
    pub views: u64,
    /// Abbreviated view count, e.g. `"1.5M"`.
    pub views_display: String,
    pub likes: u64,
    pub dislikes: u64,
    pub categories: Vec<String>,
    pub primary_category: String,
    pub tags: Vec<String>,
    pub performers: Vec<String>,
    pub screenshots: Vec<String>,
}

impl Video {
    /// True when the video can be played inline.
    pub fn has_embed(&self) -> bool {
        !self.embed_url.is_empty()
    }
}

/// Facet listing entry (category, performer or tag).
///
/// `count` is extrapolated from the startup sample and is not an exact
/// corpus-wide count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetEntry {
    pub name: String,
    pub slug: String,
    pub count: u64,
}

impl FacetEntry {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self { name, slug, count }
    }
}

/// One page of videos.
///
/// `total_videos` is an estimate for plain pagination (shard count times
/// page size) and the accumulated match count for search/filter results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedResult {
    pub videos: Vec<Video>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_videos: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PaginatedResult {
    pub fn new(
        videos: Vec<Video>,
        current_page: u32,
        total_pages: u32,
        total_videos: u64,
    ) -> Self {
        Self {
            videos,
            current_page,
            total_pages,
            total_videos,
            has_next: current_page < total_pages,
            has_previous: current_page > 1,
        }
    }

    /// Single empty page, used when there is nothing to show.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 1, 1, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}

/// Derive a URL slug from a facet name.
///
/// Alphanumerics (Unicode included) are lowercased and kept; every other
/// run of characters becomes a single `-`. Leading and trailing dashes are
/// dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
