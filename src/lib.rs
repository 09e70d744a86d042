//! trailhead-rag: multi-modal RAG for national-park activity search
//!
//! A user question is turned into structured search parameters by an LLM,
//! run as a geo-filtered hybrid query (lexical match plus dual k-NN under
//! reciprocal rank fusion) against an Elasticsearch photo index, and
//! answered in natural language grounded in the retrieved documents. A
//! separate offline pipeline embeds photo metadata with CLIP and writes the
//! index documents.

pub mod catalog;
pub mod config;
pub mod error;
pub mod extraction;
pub mod generation;
pub mod ingestion;
pub mod orchestrator;
pub mod providers;
pub mod search;
pub mod server;
pub mod types;

pub use catalog::{GeoPoint, Park, ParkCatalog};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use orchestrator::QueryOrchestrator;
pub use types::{AnswerKind, QueryOutcome, RetrievalHit, SearchParameters};
