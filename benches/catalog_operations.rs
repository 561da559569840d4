//! Benchmark suite for catalog engine operations
//!
//! Covers the per-request read paths:
//! - paginate (single shard load)
//! - get_by_id (positional lookup)
//! - search / filter (bounded scans, cap-limited and shard-limited)
//! - engine open (discovery + metadata sampling)
//!
//! Run: cargo bench --bench catalog_operations

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use shardcat::{CatalogEngine, EngineConfig};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn create_corpus(shards: u32, per_shard: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    for i in 1..=shards {
        let records: Vec<serde_json::Value> = (0..per_shard)
            .map(|j| {
                json!({
                    "title": format!("video {} of shard {}", j, i),
                    "embed": "<iframe src=\"https://player.example/embed/x\"></iframe>",
                    "thumbnail": "https://img.example/thumb.jpg",
                    "screenshots": "s1.jpg;s2.jpg;s3.jpg",
                    "tags": format!("tag{};tag{}", j % 40, j % 7),
                    "categories": format!("Category {};General", j % 25),
                    "performers": format!("Performer {}", (i as usize + j) % 300),
                    "duration": "347",
                    "views": format!("{}", j * 1013),
                    "likes": "40",
                    "dislikes": "2",
                })
            })
            .collect();
        std::fs::write(
            dir.path().join(format!("videos_{}.json", i)),
            serde_json::to_string(&records).unwrap(),
        )
        .unwrap();
    }
    dir
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_paginate(c: &mut Criterion) {
    let mut group = c.benchmark_group("paginate");
    for per_shard in [50usize, 200, 1000] {
        let dir = create_corpus(10, per_shard);
        let engine = CatalogEngine::open(EngineConfig::new(dir.path())).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(per_shard), &engine, |b, engine| {
            b.iter(|| black_box(engine.paginate(5).unwrap()));
        });
    }
    group.finish();
}

fn bench_get_by_id(c: &mut Criterion) {
    let dir = create_corpus(10, 200);
    let engine = CatalogEngine::open(EngineConfig::new(dir.path())).unwrap();
    c.bench_function("get_by_id", |b| {
        b.iter(|| black_box(engine.get_by_id("7-150").unwrap()));
    });
}

fn bench_scans(c: &mut Criterion) {
    let dir = create_corpus(40, 200);
    let engine = CatalogEngine::open(EngineConfig::new(dir.path())).unwrap();

    let mut group = c.benchmark_group("bounded_scan");
    // Dense match: match cap trips in the first shard.
    group.bench_function("search_dense", |b| {
        b.iter(|| black_box(engine.search("video", 1).unwrap()));
    });
    // No match: the full shard cap is scanned.
    group.bench_function("search_miss", |b| {
        b.iter(|| black_box(engine.search("nothing-matches", 1).unwrap()));
    });
    group.bench_function("filter_category", |b| {
        b.iter(|| black_box(engine.filter_by_category("category 3", 1).unwrap()));
    });
    group.bench_function("filter_performer", |b| {
        b.iter(|| black_box(engine.filter_by_performer("performer 29", 1).unwrap()));
    });
    group.finish();
}

fn bench_open(c: &mut Criterion) {
    let mut group = c.benchmark_group("open");
    group.sample_size(10);
    for shards in [10u32, 60] {
        let dir = create_corpus(shards, 200);
        group.bench_with_input(BenchmarkId::from_parameter(shards), &dir, |b, dir| {
            b.iter(|| black_box(CatalogEngine::open(EngineConfig::new(dir.path())).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_paginate, bench_get_by_id, bench_scans, bench_open);
criterion_main!(benches);
