//! Configuration for the trailhead RAG service

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main service configuration
///
/// Loaded from an optional TOML file (`trailhead.toml`) with environment
/// variables filling in the Elasticsearch connection. The three `ES_*`
/// variables are required: startup fails immediately when any is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Elasticsearch connection and hybrid-search tuning
    #[serde(default)]
    pub search: SearchConfig,
    /// CLIP embedding model configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Ollama/LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Ingestion configuration
    #[serde(default)]
    pub ingest: IngestConfig,
}

impl AppConfig {
    /// Load configuration: TOML file if present, then environment overrides,
    /// then validation. The file path defaults to `trailhead.toml` in the
    /// working directory and can be overridden with `TRAILHEAD_CONFIG`.
    pub fn load() -> Result<Self> {
        let path = std::env::var("TRAILHEAD_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("trailhead.toml"));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Fill connection settings from the environment
    fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("ES_HOST") {
            self.search.host = host;
        }
        if let Ok(key) = std::env::var("ES_API_KEY") {
            self.search.api_key = key;
        }
        if let Ok(index) = std::env::var("ES_INDEX") {
            self.search.index = index;
        }
        if let Ok(url) = std::env::var("OLLAMA_HOST") {
            self.llm.base_url = url;
        }
        if let Ok(dir) = std::env::var("TRAILHEAD_MODEL_DIR") {
            self.embedding.model_dir = PathBuf::from(dir);
        }
    }

    /// Fail fast on missing required settings
    pub fn validate(&self) -> Result<()> {
        if self.search.host.is_empty() {
            return Err(Error::Config("ES_HOST is not set".to_string()));
        }
        if self.search.api_key.is_empty() {
            return Err(Error::Config("ES_API_KEY is not set".to_string()));
        }
        if self.search.index.is_empty() {
            return Err(Error::Config("ES_INDEX is not set".to_string()));
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

/// Elasticsearch connection and hybrid-search tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Elasticsearch endpoint URL
    pub host: String,
    /// API key for the `Authorization: ApiKey` header
    pub api_key: String,
    /// Index name
    pub index: String,
    /// Top-k per knn retriever branch
    pub knn_k: usize,
    /// Candidate pool per knn retriever branch
    pub num_candidates: usize,
    /// Final result size after rank fusion
    pub result_size: usize,
    /// Use the server-side `retriever.rrf` request. Clusters without the RRF
    /// retriever (pre-8.14 or basic license) need this off; the three branches
    /// then run as separate searches fused client-side.
    pub server_side_fusion: bool,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            api_key: String::new(),
            index: String::new(),
            knn_k: 10,
            num_candidates: 100,
            result_size: 3,
            server_side_fusion: true,
            timeout_secs: 30,
        }
    }
}

/// CLIP embedding model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Directory holding `text_model.onnx`, `vision_model.onnx`, `tokenizer.json`
    pub model_dir: PathBuf,
    /// Embedding dimensions (512 for CLIP ViT-B/32)
    pub dimensions: usize,
    /// Square resolution images are resized to before feature extraction
    pub image_size: u32,
    /// Maximum token sequence length (CLIP is trained at 77)
    pub max_tokens: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models/clip-vit-base-patch32"),
            dimensions: 512,
            image_size: 224,
            max_tokens: 77,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Chat model name
    pub model: String,
    /// Temperature for parameter extraction (deterministic structured output)
    pub extraction_temperature: f32,
    /// Temperature for answer synthesis (varied prose)
    pub synthesis_temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "cogito:3b".to_string(),
            extraction_temperature: 0.0,
            synthesis_temperature: 0.3,
            timeout_secs: 120,
        }
    }
}

/// Ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Directory holding per-photo metadata JSON files and their images
    pub metadata_dir: PathBuf,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            metadata_dir: PathBuf::from("images_metadata"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.search.knn_k, 10);
        assert_eq!(config.search.num_candidates, 100);
        assert_eq!(config.search.result_size, 3);
        assert!(config.search.server_side_fusion);
        assert_eq!(config.llm.extraction_temperature, 0.0);
        assert_eq!(config.llm.synthesis_temperature, 0.3);
        assert_eq!(config.embedding.dimensions, 512);
        assert_eq!(config.embedding.image_size, 224);
    }

    #[test]
    fn test_validate_rejects_missing_connection() {
        let config = AppConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ES_HOST"));

        let mut config = AppConfig::default();
        config.search.host = "https://example.es.io:9243".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ES_API_KEY"));

        config.search.api_key = "key".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ES_INDEX"));

        config.search.index = "parks_photos".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_src = r#"
            [search]
            host = "https://example.es.io:9243"
            api_key = "secret"
            index = "parks_photos"
            result_size = 5
            server_side_fusion = false

            [llm]
            model = "llama3.2:3b"
        "#;
        let config: AppConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(config.search.result_size, 5);
        assert!(!config.search.server_side_fusion);
        assert_eq!(config.llm.model, "llama3.2:3b");
        // Untouched sections keep their defaults
        assert_eq!(config.search.knn_k, 10);
        assert_eq!(config.server.port, 8080);
    }
}
