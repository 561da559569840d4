//! Bounded shard scan shared by search and the facet filters.
//!
//! Shards are consumed lazily from index 1 upwards. The scan stops as soon
//! as either `max_matches` results are accumulated or `max_shards` shards
//! have been read, whichever comes first. The work per call is therefore
//! bounded no matter how many videos match corpus-wide. The result may be
//! incomplete and its size is not a corpus total.

use crate::config::ScanLimits;
use crate::model::{PaginatedResult, Video};
use crate::storage::ShardReader;

// ── Matching ───────────────────────────────────────────────────────

/// Which fields a matcher inspects, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Substring of title, or of any tag, category or performer.
    Search,
    /// Case-insensitive equality with a category.
    CategoryEquals,
    /// Case-insensitive equality with a tag.
    TagEquals,
    /// Case-insensitive substring of a performer name.
    PerformerContains,
}

#[derive(Debug, Clone)]
pub struct VideoMatcher {
    kind: MatchKind,
    /// Lowercased.
    needle: String,
}

impl VideoMatcher {
    pub fn new(kind: MatchKind, needle: &str) -> Self {
        Self {
            kind,
            needle: needle.to_lowercase(),
        }
    }

    pub fn search(query: &str) -> Self {
        Self::new(MatchKind::Search, query)
    }

    pub fn category(name: &str) -> Self {
        Self::new(MatchKind::CategoryEquals, name)
    }

    pub fn tag(name: &str) -> Self {
        Self::new(MatchKind::TagEquals, name)
    }

    pub fn performer(name: &str) -> Self {
        Self::new(MatchKind::PerformerContains, name)
    }

    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    pub fn matches(&self, video: &Video) -> bool {
        match self.kind {
            MatchKind::Search => {
                self.contained_in(&video.title)
                    || video.tags.iter().any(|t| self.contained_in(t))
                    || video.categories.iter().any(|c| self.contained_in(c))
                    || video.performers.iter().any(|p| self.contained_in(p))
            }
            MatchKind::CategoryEquals => video.categories.iter().any(|c| self.equals(c)),
            MatchKind::TagEquals => video.tags.iter().any(|t| self.equals(t)),
            MatchKind::PerformerContains => video.performers.iter().any(|p| self.contained_in(p)),
        }
    }

    #[inline]
    fn contained_in(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.needle)
    }

    #[inline]
    fn equals(&self, value: &str) -> bool {
        value.to_lowercase() == self.needle
    }
}

// ── Scan ───────────────────────────────────────────────────────────

/// Why a bounded scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    MatchCap,
    /// `max_shards` shards were read and more remained unread.
    ShardCap,
    /// Every shard was scanned before either cap tripped.
    Exhausted,
}

#[derive(Debug)]
pub struct ScanOutcome {
    pub matches: Vec<Video>,
    pub shards_scanned: u32,
    pub skipped_shards: u32,
    pub stop: StopReason,
}

/// Scan shards in index order until a cap trips.
///
/// Corrupt shards are logged and skipped; they still count towards
/// `max_shards`. Missing shards are empty.
pub fn bounded_scan(
    reader: &ShardReader,
    total_shards: u32,
    limits: ScanLimits,
    matcher: &VideoMatcher,
) -> ScanOutcome {
    let last = limits.max_shards.min(total_shards);
    let mut shards = (1..=last).map(|index| (index, reader.load_shard(index)));

    let mut matches = Vec::new();
    let mut shards_scanned = 0u32;
    let mut skipped_shards = 0u32;

    let stop = 'scan: loop {
        if matches.len() >= limits.max_matches {
            break 'scan StopReason::MatchCap;
        }
        let Some((index, loaded)) = shards.next() else {
            let reason = if total_shards > limits.max_shards {
                StopReason::ShardCap
            } else {
                StopReason::Exhausted
            };
            break 'scan reason;
        };
        shards_scanned += 1;

        let videos = match loaded {
            Ok(videos) => videos,
            Err(e) => {
                skipped_shards += 1;
                tracing::warn!(shard = index, "scan skipped shard: {}", e);
                continue;
            }
        };

        for video in videos {
            if matcher.matches(&video) {
                matches.push(video);
                if matches.len() >= limits.max_matches {
                    break 'scan StopReason::MatchCap;
                }
            }
        }
    };

    tracing::debug!(
        kind = ?matcher.kind(),
        matched = matches.len(),
        shards_scanned,
        skipped_shards,
        stop = ?stop,
        "bounded scan finished"
    );

    ScanOutcome {
        matches,
        shards_scanned,
        skipped_shards,
        stop,
    }
}

/// Paginate an accumulated match list. `page` is clamped into
/// `[1, total_pages]`; an empty list is a single empty page.
pub fn page_of(matches: Vec<Video>, page: i64, per_page: usize) -> PaginatedResult {
    let total = matches.len();
    let total_pages = total.div_ceil(per_page).max(1);
    let current = page.clamp(1, total_pages as i64) as usize;

    let videos: Vec<Video> = matches
        .into_iter()
        .skip((current - 1) * per_page)
        .take(per_page)
        .collect();

    PaginatedResult::new(videos, current as u32, total_pages as u32, total as u64)
}
