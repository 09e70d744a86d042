//! RAG server binary
//!
//! Run with: cargo run --bin trailhead-server

use trailhead_rag::config::AppConfig;
use trailhead_rag::providers::OllamaChat;
use trailhead_rag::server::RagServer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trailhead_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    tracing::info!("configuration loaded");
    tracing::info!("  - index: {}", config.search.index);
    tracing::info!("  - embedding model dir: {}", config.embedding.model_dir.display());
    tracing::info!("  - chat model: {}", config.llm.model);

    // Warn early when Ollama is down; queries would fail at extraction time
    let probe = OllamaChat::new(&config.llm)?;
    if probe.health_check().await {
        tracing::info!("Ollama is running at {}", config.llm.base_url);
    } else {
        tracing::warn!("Ollama not reachable at {}", config.llm.base_url);
        tracing::warn!("Start it with: ollama serve && ollama pull {}", config.llm.model);
    }

    let server = RagServer::new(config)?;
    tracing::info!("API: http://{}/api/query", server.address());

    server.start().await?;

    Ok(())
}
