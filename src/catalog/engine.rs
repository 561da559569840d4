//! Catalog engine: the public query surface.
//!
//! Opening an engine discovers the shard count, measures the page size
//! from shard 1 and runs the metadata sampler. A `CatalogEngine` value
//! only exists once all of that has finished, so every handle is ready to
//! serve. Nothing is mutated afterwards: all queries take `&self` and the
//! engine can be shared across threads through `Arc` without locks.
//!
//! Changed shard files are only picked up by opening a new engine.

use crate::catalog::sampler::MetadataSampler;
use crate::catalog::scan::{bounded_scan, page_of, VideoMatcher};
use crate::config::{EngineConfig, ScanLimits};
use crate::error::Result;
use crate::identity;
use crate::model::{FacetEntry, PaginatedResult, Video};
use crate::storage::{Normalizer, ShardLayout, ShardReader};

// ── Catalog Stats ──────────────────────────────────────────────────

/// Startup figures for monitoring.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CatalogStats {
    pub total_shards: u32,
    pub videos_per_page: usize,
    pub total_videos_estimate: u64,
    pub sampled_shards: u32,
    pub skipped_sample_shards: u32,
    pub distinct_categories: usize,
    pub distinct_performers: usize,
    pub distinct_tags: usize,
}

// ── Catalog Engine ─────────────────────────────────────────────────

#[derive(Debug)]
pub struct CatalogEngine {
    config: EngineConfig,
    reader: ShardReader,
    total_shards: u32,
    videos_per_page: usize,
    sampler: MetadataSampler,
}

impl CatalogEngine {
    /// Discover shards and sample facets. Blocks until done.
    ///
    /// Fails with `InitializationFailure` if the shard directory cannot be
    /// listed, or `InvalidConfig` if the configuration is rejected.
    pub fn open(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let layout = ShardLayout::new(
            config.shard_dir.clone(),
            config.shard_prefix.clone(),
            config.shard_suffix.clone(),
        );
        let total_shards = layout.discover()?;
        let reader = ShardReader::new(layout, Normalizer::new(config.list_delimiter));

        let videos_per_page = if total_shards == 0 {
            0
        } else {
            match reader.load_raw(1) {
                Ok(records) => records.len(),
                Err(e) => {
                    tracing::warn!("cannot measure page size from shard 1: {}", e);
                    0
                }
            }
        };

        let sampler = MetadataSampler::sample(&reader, total_shards, config.sampler);

        tracing::info!(
            dir = %config.shard_dir.display(),
            total_shards,
            videos_per_page,
            sampled_shards = sampler.sampled_shards(),
            "catalog ready"
        );

        Ok(Self {
            config,
            reader,
            total_shards,
            videos_per_page,
            sampler,
        })
    }

    // ── Pagination & lookup ────────────────────────────────────────

    /// One shard per page. `page` is clamped into `[1, total_shards]`.
    ///
    /// `total_videos` is `total_shards * videos_per_page`, an estimate
    /// since the last shard may be shorter. A corrupt target shard is
    /// returned as `CorruptShard`.
    pub fn paginate(&self, page: i64) -> Result<PaginatedResult> {
        if self.total_shards == 0 {
            return Ok(PaginatedResult::empty());
        }

        let current = page.clamp(1, i64::from(self.total_shards)) as u32;
        let videos = self.reader.load_shard(current)?;

        Ok(PaginatedResult::new(
            videos,
            current,
            self.total_shards,
            self.total_videos_estimate(),
        ))
    }

    /// Fetch a single video by its positional id.
    pub fn get_by_id(&self, id: &str) -> Result<Video> {
        let id = identity::decode(id)?;
        self.reader.video_at(id.shard, id.position)
    }

    // ── Bounded scans ──────────────────────────────────────────────

    /// Case-insensitive substring search over title, tags, categories and
    /// performers. Bounded by the `search` scan limits.
    pub fn search(&self, query: &str, page: i64) -> Result<PaginatedResult> {
        Ok(self.scan_page(VideoMatcher::search(query), self.config.search, page))
    }

    /// Videos with a category equal (ignoring case) to `name`.
    pub fn filter_by_category(&self, name: &str, page: i64) -> Result<PaginatedResult> {
        Ok(self.scan_page(VideoMatcher::category(name), self.config.category_filter, page))
    }

    /// Videos with a performer whose name contains `name`, ignoring case.
    pub fn filter_by_performer(&self, name: &str, page: i64) -> Result<PaginatedResult> {
        Ok(self.scan_page(VideoMatcher::performer(name), self.config.performer_filter, page))
    }

    /// Videos with a tag equal (ignoring case) to `name`.
    pub fn filter_by_tag(&self, name: &str, page: i64) -> Result<PaginatedResult> {
        Ok(self.scan_page(VideoMatcher::tag(name), self.config.tag_filter, page))
    }

    fn scan_page(&self, matcher: VideoMatcher, limits: ScanLimits, page: i64) -> PaginatedResult {
        let outcome = bounded_scan(&self.reader, self.total_shards, limits, &matcher);
        page_of(outcome.matches, page, self.config.results_per_page)
    }

    // ── Facets ─────────────────────────────────────────────────────

    pub fn facet_categories(&self) -> &[FacetEntry] {
        self.sampler.categories()
    }

    pub fn facet_performers(&self) -> &[FacetEntry] {
        self.sampler.performers()
    }

    pub fn facet_tags(&self) -> &[FacetEntry] {
        self.sampler.tags()
    }

    /// Resolve a category by slug or name against the sampled table.
    pub fn find_category(&self, key: &str) -> Option<&FacetEntry> {
        self.sampler.find_category(key)
    }

    pub fn find_performer(&self, key: &str) -> Option<&FacetEntry> {
        self.sampler.find_performer(key)
    }

    pub fn find_tag(&self, key: &str) -> Option<&FacetEntry> {
        self.sampler.find_tag(key)
    }

    // ── Totals ─────────────────────────────────────────────────────

    pub fn total_shards(&self) -> u32 {
        self.total_shards
    }

    pub fn videos_per_page(&self) -> usize {
        self.videos_per_page
    }

    pub fn total_videos_estimate(&self) -> u64 {
        u64::from(self.total_shards) * self.videos_per_page as u64
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> CatalogStats {
        let (distinct_categories, distinct_performers, distinct_tags) = self.sampler.table_sizes();
        CatalogStats {
            total_shards: self.total_shards,
            videos_per_page: self.videos_per_page,
            total_videos_estimate: self.total_videos_estimate(),
            sampled_shards: self.sampler.sampled_shards(),
            skipped_sample_shards: self.sampler.skipped_shards(),
            distinct_categories,
            distinct_performers,
            distinct_tags,
        }
    }
}
