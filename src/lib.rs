//! shardcat - read-only catalog engine over sharded video listings.
//!
//! The collection is stored as numbered JSON shard files. The engine
//! answers pagination, id lookup, bounded search and facet filters by
//! reading shards on demand, and serves approximate facet listings from a
//! sample taken once at startup.
//!
//! ```no_run
//! use shardcat::{CatalogEngine, EngineConfig};
//!
//! let engine = CatalogEngine::open(EngineConfig::new("/data/shards")).unwrap();
//! let page = engine.paginate(1).unwrap();
//! let hits = engine.search("sunset", 1).unwrap();
//! println!("{} videos on page 1, {} search hits", page.videos.len(), hits.total_videos);
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod model;
pub mod storage;

pub use catalog::{CatalogEngine, CatalogQuery, CatalogStats, QueryParams};
pub use config::{EngineConfig, SamplerConfig, ScanLimits};
pub use error::{CatalogError, Result};
pub use identity::VideoId;
pub use model::{FacetEntry, PaginatedResult, Video};
pub use storage::{RawRecord, ShardLayout, ShardReader};
