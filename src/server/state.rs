//! Application state for the HTTP server

use std::sync::Arc;

use crate::catalog::ParkCatalog;
use crate::config::AppConfig;
use crate::error::Result;
use crate::extraction::ParameterExtractor;
use crate::generation::ResponseSynthesizer;
use crate::orchestrator::QueryOrchestrator;
use crate::providers::{ChatProvider, ClipEmbedder, OllamaChat};
use crate::search::ElasticClient;

/// Shared application state: the orchestrator and everything it needs,
/// constructed once at startup and passed by reference into each request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    orchestrator: QueryOrchestrator,
}

impl AppState {
    /// Construct the full provider graph from configuration.
    /// Fails fast when the embedding model or connection settings are absent.
    pub fn new(config: AppConfig) -> Result<Self> {
        let catalog = ParkCatalog::builtin();
        tracing::info!(parks = catalog.len(), "park catalog loaded");

        let embedder = Arc::new(ClipEmbedder::new(&config.embedding)?);
        tracing::info!(dimensions = config.embedding.dimensions, "embedder ready");

        let chat: Arc<dyn ChatProvider> = Arc::new(OllamaChat::new(&config.llm)?);
        let backend = Arc::new(ElasticClient::new(&config.search)?);

        let extractor = ParameterExtractor::new(Arc::clone(&chat), &config.llm);
        let synthesizer = ResponseSynthesizer::new(chat, &config.llm);

        let orchestrator = QueryOrchestrator::new(
            catalog,
            embedder,
            backend,
            extractor,
            synthesizer,
            config.search.clone(),
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                orchestrator,
            }),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn orchestrator(&self) -> &QueryOrchestrator {
        &self.inner.orchestrator
    }
}
