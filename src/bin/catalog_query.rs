//! catalog-query: run catalog engine queries from the command line.
//!
//! Opens the shard directory, runs one query and prints the result as
//! JSON to stdout. Logs go to stderr; set `RUST_LOG` to change the level.
//!
//! Run: cargo run --bin catalog-query -- --dir ./shards search sunset

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use shardcat::{CatalogEngine, CatalogQuery, EngineConfig, QueryParams};

#[derive(Parser, Debug)]
#[command(name = "catalog-query", version, about = "Query a sharded video catalog")]
struct Cli {
    /// Shard directory (overrides config file and SHARDCAT_DIR)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Shard file name prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Shard file name suffix
    #[arg(long)]
    suffix: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plain pagination, one shard per page
    Page {
        #[arg(allow_negative_numbers = true)]
        page: i64,
    },
    /// Look up one video by id ("<shard>-<position>")
    Get { id: String },
    /// Bounded substring search
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: i64,
    },
    /// Filter by exact category
    Category {
        name: String,
        #[arg(long, default_value_t = 1)]
        page: i64,
    },
    /// Filter by performer name substring
    Performer {
        name: String,
        #[arg(long, default_value_t = 1)]
        page: i64,
    },
    /// Filter by exact tag
    Tag {
        name: String,
        #[arg(long, default_value_t = 1)]
        page: i64,
    },
    /// Sampled facet listing
    Facets {
        #[arg(value_enum)]
        kind: FacetKind,
    },
    /// Startup statistics
    Stats,
    /// Listing request with raw parameters, resolved by dispatch precedence
    Browse {
        #[arg(long)]
        page: Option<String>,
        #[arg(long)]
        q: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        performer: Option<String>,
        #[arg(long)]
        tag: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FacetKind {
    Categories,
    Performers,
    Tags,
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let config = match &cli.config {
        Some(path) => EngineConfig::read_from(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => EngineConfig::new(PathBuf::from(".")),
    };
    let mut config = config.apply_env();

    if let Some(dir) = &cli.dir {
        config.shard_dir = dir.clone();
    }
    if let Some(prefix) = &cli.prefix {
        config.shard_prefix = prefix.clone();
    }
    if let Some(suffix) = &cli.suffix {
        config.shard_suffix = suffix.clone();
    }
    Ok(config)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let dir = config.shard_dir.clone();
    let engine = CatalogEngine::open(config)
        .with_context(|| format!("opening catalog at {}", dir.display()))?;

    match cli.command {
        Command::Page { page } => print_json(&engine.paginate(page)?),
        Command::Get { id } => print_json(&engine.get_by_id(&id)?),
        Command::Search { query, page } => print_json(&engine.search(&query, page)?),
        Command::Category { name, page } => print_json(&engine.filter_by_category(&name, page)?),
        Command::Performer { name, page } => print_json(&engine.filter_by_performer(&name, page)?),
        Command::Tag { name, page } => print_json(&engine.filter_by_tag(&name, page)?),
        Command::Facets { kind } => match kind {
            FacetKind::Categories => print_json(engine.facet_categories()),
            FacetKind::Performers => print_json(engine.facet_performers()),
            FacetKind::Tags => print_json(engine.facet_tags()),
        },
        Command::Stats => print_json(&engine.stats()),
        Command::Browse { page, q, category, performer, tag } => {
            let params = QueryParams { page, q, category, performer, tag };
            let query = CatalogQuery::from_params(&params);
            tracing::debug!(?query, "dispatching listing request");
            print_json(&engine.execute(&query)?)
        }
    }
}
