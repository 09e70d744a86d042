//! Query orchestration: extraction, per-park retrieval, synthesis

use std::sync::Arc;

use crate::catalog::ParkCatalog;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::extraction::ParameterExtractor;
use crate::generation::ResponseSynthesizer;
use crate::providers::EmbeddingProvider;
use crate::search::{self, HybridQuery, SearchBackend};
use crate::types::{AnswerKind, QueryOutcome, RetrievalHit, SearchParameters};

/// Sequences one user query end-to-end: extract parameters, run the hybrid
/// search per candidate park, synthesize the answer over everything found.
///
/// Failure policy: extraction failure means the query was not understood and
/// nothing is searched; a single park's search failure is logged and the
/// remaining parks still run; synthesis failure is reported as a typed
/// outcome alongside whatever hits were retrieved.
pub struct QueryOrchestrator {
    catalog: ParkCatalog,
    embedder: Arc<dyn EmbeddingProvider>,
    backend: Arc<dyn SearchBackend>,
    extractor: ParameterExtractor,
    synthesizer: ResponseSynthesizer,
    search_config: SearchConfig,
}

impl QueryOrchestrator {
    pub fn new(
        catalog: ParkCatalog,
        embedder: Arc<dyn EmbeddingProvider>,
        backend: Arc<dyn SearchBackend>,
        extractor: ParameterExtractor,
        synthesizer: ResponseSynthesizer,
        search_config: SearchConfig,
    ) -> Self {
        Self {
            catalog,
            embedder,
            backend,
            extractor,
            synthesizer,
            search_config,
        }
    }

    /// Process one user query
    pub async fn handle(&self, user_query: &str) -> Result<QueryOutcome> {
        tracing::info!(query = user_query, "processing query");

        let params = match self.extractor.extract(user_query, &self.catalog).await {
            Ok(params) => params,
            Err(e) => {
                tracing::warn!(error = %e, "parameter extraction failed");
                return Ok(QueryOutcome::not_understood());
            }
        };

        tracing::info!(?params, "extracted search parameters");

        let hits = self.search_parks(&params).await;

        let answer = match self.synthesizer.synthesize(user_query, &hits, &params).await {
            Ok(text) if text.trim().is_empty() => AnswerKind::EmptyReply,
            Ok(text) => AnswerKind::Answer(text),
            Err(e) => {
                tracing::error!(error = %e, "answer synthesis failed");
                AnswerKind::SynthesisFailed
            }
        };

        Ok(QueryOutcome {
            answer,
            hits,
            params: Some(params),
        })
    }

    /// Run the hybrid search for every candidate park, accumulating hits
    /// across all of them into one combined sequence.
    async fn search_parks(&self, params: &SearchParameters) -> Vec<RetrievalHit> {
        let park_ids = if params.park_ids.is_empty() {
            self.catalog.ids()
        } else {
            params.park_ids.clone()
        };

        tracing::info!(
            parks = park_ids.len(),
            topic = %params.topic,
            "searching candidate parks"
        );

        let topic_embedding = match self.embedder.embed_text(&params.topic).await {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!(error = %e, "topic embedding failed, skipping search");
                return Vec::new();
            }
        };

        let radius = params.radius();
        let mut all_hits = Vec::new();

        for park_id in &park_ids {
            let Some(park) = self.catalog.get(park_id) else {
                tracing::warn!(%park_id, "unknown park id, skipping");
                continue;
            };

            let query = HybridQuery::new(
                park.coordinates,
                &radius,
                &params.topic,
                &topic_embedding,
                &self.search_config,
            );

            match search::execute_hybrid(self.backend.as_ref(), &query, &self.search_config).await
            {
                Ok(raw_hits) => {
                    tracing::info!(%park_id, hits = raw_hits.len(), "park search complete");
                    all_hits.extend(
                        raw_hits
                            .into_iter()
                            .map(|raw| RetrievalHit::annotate(raw, park)),
                    );
                }
                Err(e) => {
                    tracing::warn!(%park_id, error = %e, "park search failed, continuing");
                }
            }
        }

        all_hits
    }
}
