//! Startup facet sampling.
//!
//! Reads the first `min(shard_cap, total_shards)` shards once and counts
//! every category, performer and tag occurrence. Counts are then scaled
//! by `ceil(total_shards / sampled_shards)` to approximate corpus-wide
//! frequencies without a full scan:
//!
//! ```text
//! total_shards = 120, shard_cap = 50  ->  sampled = 50, multiplier = 3
//! "Travel" seen 10 times in the sample  ->  count = 30
//! ```
//!
//! Shards are loaded in parallel, but their tallies are merged in
//! ascending shard order, so first-seen order (the tie-breaker for equal
//! counts) is the same as a sequential scan.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::config::SamplerConfig;
use crate::model::{slugify, FacetEntry, Video};
use crate::storage::ShardReader;

// ── Frequency Table ────────────────────────────────────────────────

/// Name -> occurrence count, remembering first-seen order.
#[derive(Debug, Default)]
struct FrequencyTable {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl FrequencyTable {
    fn add(&mut self, name: &str, n: u64) {
        match self.index.get(name) {
            Some(&slot) => self.entries[slot].1 += n,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), n));
            }
        }
    }

    fn add_all<'a>(&mut self, names: impl IntoIterator<Item = &'a String>) {
        for name in names {
            self.add(name, 1);
        }
    }

    fn merge(&mut self, other: FrequencyTable) {
        for (name, n) in other.entries {
            self.add(&name, n);
        }
    }

    /// Entries sorted by count descending. Stable, so ties keep first-seen order.
    fn into_ranked(self, multiplier: u64) -> Vec<FacetEntry> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
            .into_iter()
            .map(|(name, n)| FacetEntry::new(name, n * multiplier))
            .collect()
    }
}

/// Per-shard tally, built in parallel.
#[derive(Debug, Default)]
struct ShardTally {
    categories: FrequencyTable,
    performers: FrequencyTable,
    tags: FrequencyTable,
}

impl ShardTally {
    fn from_videos(videos: &[Video]) -> Self {
        let mut tally = Self::default();
        for video in videos {
            tally.categories.add_all(&video.categories);
            tally.performers.add_all(&video.performers);
            tally.tags.add_all(&video.tags);
        }
        tally
    }

    fn merge(&mut self, other: ShardTally) {
        self.categories.merge(other.categories);
        self.performers.merge(other.performers);
        self.tags.merge(other.tags);
    }
}

// ── Metadata Sampler ───────────────────────────────────────────────

/// Read-only facet tables built once at engine startup.
#[derive(Debug)]
pub struct MetadataSampler {
    config: SamplerConfig,
    sampled_shards: u32,
    skipped_shards: u32,
    multiplier: u64,
    categories: Vec<FacetEntry>,
    performers: Vec<FacetEntry>,
    tags: Vec<FacetEntry>,
}

/// Number of shards the sampler reads.
pub fn sample_size(total_shards: u32, shard_cap: u32) -> u32 {
    shard_cap.min(total_shards)
}

/// Scale factor applied to sampled counts: `ceil(total / sampled)`.
/// Zero when nothing was sampled.
pub fn extrapolation_multiplier(total_shards: u32, sampled_shards: u32) -> u64 {
    if sampled_shards == 0 {
        return 0;
    }
    u64::from(total_shards).div_ceil(u64::from(sampled_shards))
}

impl MetadataSampler {
    /// Sample the leading shards and build the facet tables.
    ///
    /// Missing shards count as empty. Corrupt shards are logged and
    /// skipped; they still count towards the sampled shard total.
    pub fn sample(reader: &ShardReader, total_shards: u32, config: SamplerConfig) -> Self {
        let sampled_shards = sample_size(total_shards, config.shard_cap);

        let tallies: Vec<_> = (1..=sampled_shards)
            .into_par_iter()
            .map(|index| {
                reader
                    .load_shard(index)
                    .map(|videos| ShardTally::from_videos(&videos))
            })
            .collect();

        let mut merged = ShardTally::default();
        let mut skipped_shards = 0u32;
        for (index, tally) in (1..=sampled_shards).zip(tallies) {
            match tally {
                Ok(tally) => merged.merge(tally),
                Err(e) => {
                    skipped_shards += 1;
                    tracing::warn!(shard = index, "metadata sampling skipped shard: {}", e);
                }
            }
        }

        let multiplier = extrapolation_multiplier(total_shards, sampled_shards);
        tracing::debug!(
            sampled_shards,
            skipped_shards,
            multiplier,
            categories = merged.categories.entries.len(),
            performers = merged.performers.entries.len(),
            tags = merged.tags.entries.len(),
            "metadata sample complete"
        );

        Self {
            config,
            sampled_shards,
            skipped_shards,
            multiplier,
            categories: merged.categories.into_ranked(multiplier),
            performers: merged.performers.into_ranked(multiplier),
            tags: merged.tags.into_ranked(multiplier),
        }
    }

    /// Top categories by extrapolated count.
    pub fn categories(&self) -> &[FacetEntry] {
        top(&self.categories, self.config.category_limit)
    }

    /// Top performers by extrapolated count.
    pub fn performers(&self) -> &[FacetEntry] {
        top(&self.performers, self.config.performer_limit)
    }

    /// Top tags by extrapolated count.
    pub fn tags(&self) -> &[FacetEntry] {
        top(&self.tags, self.config.tag_limit)
    }

    /// Look up a sampled category by slug or case-insensitive name.
    /// Searches the whole table, not just the capped listing.
    pub fn find_category(&self, key: &str) -> Option<&FacetEntry> {
        find(&self.categories, key)
    }

    pub fn find_performer(&self, key: &str) -> Option<&FacetEntry> {
        find(&self.performers, key)
    }

    pub fn find_tag(&self, key: &str) -> Option<&FacetEntry> {
        find(&self.tags, key)
    }

    pub fn sampled_shards(&self) -> u32 {
        self.sampled_shards
    }

    pub fn skipped_shards(&self) -> u32 {
        self.skipped_shards
    }

    pub fn multiplier(&self) -> u64 {
        self.multiplier
    }

    /// Distinct names seen per table: (categories, performers, tags).
    pub fn table_sizes(&self) -> (usize, usize, usize) {
        (self.categories.len(), self.performers.len(), self.tags.len())
    }
}

fn top(entries: &[FacetEntry], limit: usize) -> &[FacetEntry] {
    &entries[..entries.len().min(limit)]
}

fn find<'a>(entries: &'a [FacetEntry], key: &str) -> Option<&'a FacetEntry> {
    let key = key.trim();
    let name = key.to_lowercase();
    let slug = slugify(key);
    entries
        .iter()
        .find(|e| e.name.to_lowercase() == name || (!slug.is_empty() && e.slug == slug))
}
