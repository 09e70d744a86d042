//! Ingestion pipeline behavior with stubbed embedder and backend

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use trailhead_rag::error::{Error, Result};
use trailhead_rag::ingestion::IngestPipeline;
use trailhead_rag::providers::EmbeddingProvider;
use trailhead_rag::search::{CreateOutcome, SearchBackend};
use trailhead_rag::types::ALLOWED_DOCUMENT_FIELDS;

/// Deterministic embedder: the vector is a pure function of the input, so
/// re-running ingestion on unchanged records produces identical embeddings.
struct DeterministicEmbedder;

fn checksum(bytes: &[u8]) -> f32 {
    bytes.iter().map(|&b| b as u32).sum::<u32>() as f32
}

#[async_trait]
impl EmbeddingProvider for DeterministicEmbedder {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        Ok(vec![checksum(text.as_bytes()), text.len() as f32])
    }

    async fn embed_image(&self, path: &Path) -> Result<Vec<f32>> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidInput("bad path".to_string()))?;
        Ok(vec![checksum(name.as_bytes()), name.len() as f32])
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        "deterministic"
    }
}

/// Backend that records every created document; optionally rejects writes.
struct RecordingBackend {
    created: Mutex<Vec<Value>>,
    reject: bool,
}

impl RecordingBackend {
    fn new() -> Self {
        Self {
            created: Mutex::new(Vec::new()),
            reject: false,
        }
    }

    fn rejecting() -> Self {
        Self {
            created: Mutex::new(Vec::new()),
            reject: true,
        }
    }

    fn documents(&self) -> Vec<Value> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for RecordingBackend {
    async fn execute(&self, _body: &Value) -> Result<Vec<trailhead_rag::types::RawHit>> {
        Ok(Vec::new())
    }

    async fn create_document(&self, doc: &Value) -> Result<CreateOutcome> {
        if self.reject {
            return Ok(CreateOutcome::Rejected);
        }
        self.created.lock().unwrap().push(doc.clone());
        Ok(CreateOutcome::Created)
    }
}

fn write_record(dir: &Path, name: &str, record: &Value) {
    std::fs::write(dir.join(name), serde_json::to_string_pretty(record).unwrap()).unwrap();
}

fn sample_record() -> Value {
    json!({
        "photo_id": "p-001",
        "title": "Delicate Arch",
        "description": "Iconic freestanding arch",
        "geolocation": {"lat": 38.7436, "lon": -109.4993},
        "image_filename": "delicate_arch.jpg",
        "generated_description": "A sandstone arch glowing at sunset",
        "exif": {"iso": 100},
        "uploader": "ranger_bob"
    })
}

fn pipeline(backend: Arc<RecordingBackend>) -> IngestPipeline {
    IngestPipeline::new(Arc::new(DeterministicEmbedder), backend)
}

#[tokio::test]
async fn documents_are_embedded_and_pruned() {
    let dir = tempfile::tempdir().unwrap();
    write_record(dir.path(), "p-001.json", &sample_record());

    let backend = Arc::new(RecordingBackend::new());
    let report = pipeline(Arc::clone(&backend)).run(dir.path()).await.unwrap();

    assert_eq!(report.indexed, 1);
    assert_eq!(report.failed, 0);

    let docs = backend.documents();
    assert_eq!(docs.len(), 1);
    let doc = docs[0].as_object().unwrap();

    // Only the allowed fields survive
    assert!(doc.keys().all(|k| ALLOWED_DOCUMENT_FIELDS.contains(&k.as_str())));
    assert!(!doc.contains_key("exif"));
    assert!(!doc.contains_key("uploader"));

    // Both embeddings present with the model dimensionality
    assert_eq!(doc["text_embedding"].as_array().unwrap().len(), 2);
    assert_eq!(doc["image_embedding"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn reingestion_produces_identical_embeddings() {
    let dir = tempfile::tempdir().unwrap();
    write_record(dir.path(), "p-001.json", &sample_record());

    let first = Arc::new(RecordingBackend::new());
    pipeline(Arc::clone(&first)).run(dir.path()).await.unwrap();

    let second = Arc::new(RecordingBackend::new());
    pipeline(Arc::clone(&second)).run(dir.path()).await.unwrap();

    assert_eq!(
        first.documents()[0]["text_embedding"],
        second.documents()[0]["text_embedding"]
    );
    assert_eq!(
        first.documents()[0]["image_embedding"],
        second.documents()[0]["image_embedding"]
    );
}

#[tokio::test]
async fn broken_record_does_not_abort_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    // Missing generated_description
    write_record(
        dir.path(),
        "a-broken.json",
        &json!({"photo_id": "p-000", "image_filename": "x.jpg"}),
    );
    write_record(dir.path(), "b-good.json", &sample_record());

    let backend = Arc::new(RecordingBackend::new());
    let report = pipeline(Arc::clone(&backend)).run(dir.path()).await.unwrap();

    assert_eq!(report.indexed, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(backend.documents().len(), 1);
    assert_eq!(backend.documents()[0]["photo_id"], "p-001");
}

#[tokio::test]
async fn non_created_results_count_as_failures() {
    let dir = tempfile::tempdir().unwrap();
    write_record(dir.path(), "p-001.json", &sample_record());

    let backend = Arc::new(RecordingBackend::rejecting());
    let report = pipeline(backend).run(dir.path()).await.unwrap();

    assert_eq!(report.indexed, 0);
    assert_eq!(report.failed, 1);
}

#[tokio::test]
async fn empty_directory_is_a_clean_run() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(RecordingBackend::new());
    let report = pipeline(backend).run(dir.path()).await.unwrap();

    assert_eq!(report.indexed, 0);
    assert_eq!(report.failed, 0);
}
