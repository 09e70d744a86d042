//! Search backend trait and the Elasticsearch client

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::types::RawHit;

/// Outcome of a create-only document write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// The index accepted the request but did not report `created`
    Rejected,
}

/// A document index that can execute search bodies and accept create-only
/// document writes. An empty hit list is a valid, non-error outcome.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Execute one search request body and return its ranked hits
    async fn execute(&self, body: &Value) -> Result<Vec<RawHit>>;

    /// Create one document. Never updates an existing document.
    async fn create_document(&self, doc: &Value) -> Result<CreateOutcome>;
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Deserialize)]
struct SearchHits {
    hits: Vec<RawHit>,
}

#[derive(Deserialize)]
struct IndexResponse {
    result: String,
}

/// Elasticsearch backend over its JSON REST API
pub struct ElasticClient {
    client: reqwest::Client,
    host: String,
    index: String,
    api_key: String,
}

impl ElasticClient {
    /// Build a client from the configured connection, with a bounded
    /// per-request timeout.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::SearchUnavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            host: config.host.trim_end_matches('/').to_string(),
            index: config.index.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn auth_header(&self) -> String {
        format!("ApiKey {}", self.api_key)
    }
}

#[async_trait]
impl SearchBackend for ElasticClient {
    async fn execute(&self, body: &Value) -> Result<Vec<RawHit>> {
        let url = format!("{}/{}/_search", self.host, self.index);

        let resp = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(body)
            .send()
            .await
            .map_err(|e| Error::SearchUnavailable(format!("search request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::SearchUnavailable(format!(
                "index returned {status}: {body}"
            )));
        }

        let parsed: SearchResponse = resp
            .json()
            .await
            .map_err(|e| Error::SearchUnavailable(format!("malformed search response: {e}")))?;

        Ok(parsed.hits.hits)
    }

    async fn create_document(&self, doc: &Value) -> Result<CreateOutcome> {
        let url = format!("{}/{}/_doc", self.host, self.index);

        let resp = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(doc)
            .send()
            .await
            .map_err(|e| Error::SearchUnavailable(format!("index request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::SearchUnavailable(format!(
                "index returned {status}: {body}"
            )));
        }

        let parsed: IndexResponse = resp
            .json()
            .await
            .map_err(|e| Error::SearchUnavailable(format!("malformed index response: {e}")))?;

        if parsed.result == "created" {
            Ok(CreateOutcome::Created)
        } else {
            Ok(CreateOutcome::Rejected)
        }
    }
}
