//! Ingestion CLI
//!
//! Run with: cargo run --bin trailhead-ingest -- --metadata-dir images_metadata

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trailhead_rag::config::AppConfig;
use trailhead_rag::ingestion::IngestPipeline;
use trailhead_rag::providers::ClipEmbedder;
use trailhead_rag::search::ElasticClient;

/// Embed photo metadata records and write them into the search index
#[derive(Parser)]
#[command(name = "trailhead-ingest", version)]
struct Args {
    /// Directory holding per-photo metadata JSON files and their images.
    /// Defaults to the configured ingest directory.
    #[arg(long)]
    metadata_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trailhead_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = AppConfig::load()?;

    let metadata_dir = args
        .metadata_dir
        .unwrap_or_else(|| config.ingest.metadata_dir.clone());

    let embedder = Arc::new(ClipEmbedder::new(&config.embedding)?);
    let backend = Arc::new(ElasticClient::new(&config.search)?);

    let pipeline = IngestPipeline::new(embedder, backend);
    let report = pipeline.run(&metadata_dir).await?;

    tracing::info!(
        indexed = report.indexed,
        failed = report.failed,
        "done"
    );

    if report.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
