//! Hybrid search: query construction, execution, and rank fusion

pub mod client;
pub mod fusion;
pub mod query;

pub use client::{CreateOutcome, ElasticClient, SearchBackend};
pub use fusion::reciprocal_rank_fusion;
pub use query::HybridQuery;

use crate::config::SearchConfig;
use crate::error::Result;
use crate::types::RawHit;

/// Run one hybrid query against the backend.
///
/// With server-side fusion the whole query goes out as a single
/// `retriever.rrf` request. Otherwise the three branches execute as
/// independent searches and are fused locally with the same rank constant
/// the server would use.
pub async fn execute_hybrid(
    backend: &dyn SearchBackend,
    query: &HybridQuery,
    config: &SearchConfig,
) -> Result<Vec<RawHit>> {
    if config.server_side_fusion {
        return backend.execute(&query.to_rrf_request()).await;
    }

    let mut branches = Vec::with_capacity(3);
    for body in query.branch_requests() {
        branches.push(backend.execute(&body).await?);
    }

    Ok(reciprocal_rank_fusion(&branches, query.result_size()))
}
