//! Corpus Chunker - Command Line Entry Point
//!
//! Splits delimited corpora into chunk files ready for embedding.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use corpus_chunker::batch::{plan_jobs, BatchConfig, BatchProcessor};
use corpus_chunker::{ChunkingConfig, ChunkingPipeline, OverlapMode};

/// Split delimited document corpora into bounded, overlapping chunks.
#[derive(Debug, Parser)]
#[command(name = "corpus-chunker", version, about)]
struct Cli {
    /// Corpus files to chunk
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Destination directory for chunk files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Maximum characters per chunk
    #[arg(long)]
    max_chunk_size: Option<i64>,

    /// Overlap budget in characters
    #[arg(long)]
    overlap_budget: Option<i64>,

    /// Marker line opening each document
    #[arg(long)]
    marker: Option<String>,

    /// Overlap-carry policy: `tiered` or `sliding_window`
    #[arg(long)]
    overlap_mode: Option<OverlapMode>,

    /// Settings file (defaults to ./chunker.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Corpora chunked concurrently
    #[arg(long)]
    concurrency: Option<usize>,

    /// Stop at the first corpus that fails
    #[arg(long)]
    fail_fast: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "corpus_chunker=info".into()),
    );
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Load configuration, CLI flags last
    let mut config =
        ChunkingConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(size) = cli.max_chunk_size {
        config.max_chunk_size = size;
    }
    if let Some(budget) = cli.overlap_budget {
        config.overlap_budget = budget;
    }
    if let Some(marker) = cli.marker {
        config.document_marker = marker;
    }
    if let Some(mode) = cli.overlap_mode {
        config.overlap_mode = mode;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir.to_string_lossy().into_owned();
    }
    if let Some(concurrency) = cli.concurrency {
        config.batch_concurrency = concurrency;
    }

    let pipeline = ChunkingPipeline::from_config(&config)?;

    info!("Starting Corpus Chunker v{}", env!("CARGO_PKG_VERSION"));
    info!(
        max_chunk_size = pipeline.params().max_chunk_size,
        overlap_budget = pipeline.params().overlap_budget,
        overlap_mode = %pipeline.params().overlap_mode,
        "Chunking parameters"
    );

    let jobs = plan_jobs(&cli.inputs, Path::new(&config.output_dir));
    let processor = BatchProcessor::new(
        Arc::new(pipeline),
        BatchConfig {
            concurrency: config.batch_concurrency,
            continue_on_error: !cli.fail_fast,
        },
    );

    let result = processor.process_batch(jobs).await?;

    if result.failed_corpora > 0 {
        for failure in &result.errors {
            eprintln!("{}: {}", failure.input.display(), failure.error);
        }
        bail!(
            "{} of {} corpora failed",
            result.failed_corpora,
            result.total_corpora
        );
    }

    Ok(())
}
