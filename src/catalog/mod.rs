//! Catalog query layer: engine, bounded scans, facet sampling, dispatch.

pub mod dispatch;
pub mod engine;
pub mod sampler;
pub mod scan;

pub use dispatch::{parse_page, CatalogQuery, QueryParams};
pub use engine::{CatalogEngine, CatalogStats};
pub use sampler::MetadataSampler;
pub use scan::{MatchKind, ScanOutcome, StopReason, VideoMatcher};
