//! Embedding provider trait

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// Produces fixed-length vectors for text and images in one shared embedding
/// space, so a text query vector is comparable against stored image vectors.
///
/// Implementations:
/// - `ClipEmbedder`: CLIP text/vision ONNX checkpoints via ort
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a text string. The returned vector is L2-normalized.
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed an image file.
    ///
    /// Fails with `InvalidInput` when the file cannot be decoded and
    /// `ModelUnavailable` when inference fails; callers must not substitute
    /// a zero vector.
    async fn embed_image(&self, path: &Path) -> Result<Vec<f32>>;

    /// Embedding dimensionality (shared by text and image vectors)
    fn dimensions(&self) -> usize;

    /// Provider name for logging
    fn name(&self) -> &str;
}
