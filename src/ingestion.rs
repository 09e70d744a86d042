//! Offline ingestion: metadata records to index documents
//!
//! For each `*.json` metadata file in the source directory: embed the
//! generated description (text) and the referenced image (image), merge the
//! embeddings into the record, prune to the allowed field set, and write a
//! single document. Writes are create-only; per-file failures are logged and
//! the batch continues.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::search::{CreateOutcome, SearchBackend};
use crate::types::{prune_to_allowed_fields, validate_document};

/// Batch counters reported after a run
#[derive(Debug, Default, Clone, Copy)]
pub struct IngestReport {
    pub indexed: usize,
    pub failed: usize,
}

/// The offline ingestion pipeline
pub struct IngestPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    backend: Arc<dyn SearchBackend>,
}

impl IngestPipeline {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, backend: Arc<dyn SearchBackend>) -> Self {
        Self { embedder, backend }
    }

    /// Ingest every metadata file in `metadata_dir`
    pub async fn run(&self, metadata_dir: &Path) -> Result<IngestReport> {
        let files = list_metadata_files(metadata_dir)?;
        tracing::info!(
            dir = %metadata_dir.display(),
            files = files.len(),
            "starting ingestion"
        );

        let mut report = IngestReport::default();

        for path in files {
            match self.ingest_file(&path, metadata_dir).await {
                Ok(CreateOutcome::Created) => {
                    tracing::info!(file = %path.display(), "document indexed");
                    report.indexed += 1;
                }
                Ok(CreateOutcome::Rejected) => {
                    tracing::error!(file = %path.display(), "index did not report created");
                    report.failed += 1;
                }
                Err(e) => {
                    tracing::error!(file = %path.display(), error = %e, "ingestion failed");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            indexed = report.indexed,
            failed = report.failed,
            "ingestion complete"
        );
        Ok(report)
    }

    async fn ingest_file(&self, path: &Path, metadata_dir: &Path) -> Result<CreateOutcome> {
        let record = load_metadata(path)?;
        let doc = self.build_document(record, metadata_dir).await?;
        self.backend.create_document(&Value::Object(doc)).await
    }

    /// Embed and prune one metadata record into an index-ready document
    async fn build_document(
        &self,
        mut record: Map<String, Value>,
        metadata_dir: &Path,
    ) -> Result<Map<String, Value>> {
        let description = record
            .get("generated_description")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::InvalidInput("metadata record has no generated_description".to_string())
            })?
            .to_string();

        let image_filename = record
            .get("image_filename")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::InvalidInput("metadata record has no image_filename".to_string())
            })?
            .to_string();

        let text_embedding = self.embedder.embed_text(&description).await?;
        let image_embedding = self
            .embedder
            .embed_image(&metadata_dir.join(&image_filename))
            .await?;

        record.insert("text_embedding".to_string(), vector_json(&text_embedding));
        record.insert("image_embedding".to_string(), vector_json(&image_embedding));

        let doc = prune_to_allowed_fields(&record);
        validate_document(&doc, self.embedder.dimensions())?;
        Ok(doc)
    }
}

fn vector_json(vector: &[f32]) -> Value {
    Value::Array(vector.iter().map(|&v| Value::from(v as f64)).collect())
}

/// Non-recursive listing of `*.json` files, in stable name order
fn list_metadata_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    if files.is_empty() {
        tracing::warn!(dir = %dir.display(), "no metadata files found");
    }
    Ok(files)
}

fn load_metadata(path: &Path) -> Result<Map<String, Value>> {
    let raw = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw)
        .map_err(|e| Error::InvalidInput(format!("{} is not valid JSON: {e}", path.display())))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::InvalidInput(format!(
            "{} is not a JSON object",
            path.display()
        ))),
    }
}
