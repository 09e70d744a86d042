//! CLIP embedding provider via ONNX Runtime
//!
//! Runs the text and vision towers of a CLIP checkpoint (ViT-B/32 by
//! default) exported to ONNX. Both towers project into one shared embedding
//! space, which is what makes the cross-modal retrieval branches work: a
//! text query vector is meaningful against stored image vectors.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;

/// Channel statistics the CLIP image processor normalizes with
const CLIP_MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];
const CLIP_STD: [f32; 3] = [0.268_629_54, 0.261_302_58, 0.275_777_11];

/// CLIP text + vision embedder backed by two ort sessions
pub struct ClipEmbedder {
    text_session: Mutex<Session>,
    vision_session: Mutex<Session>,
    tokenizer: Tokenizer,
    dimensions: usize,
    image_size: u32,
}

// Safety: Tokenizer is Send+Sync. Each Session is behind a Mutex which
// guarantees exclusive access during run().
unsafe impl Send for ClipEmbedder {}
unsafe impl Sync for ClipEmbedder {}

impl ClipEmbedder {
    /// Load both towers and the tokenizer from the configured model directory.
    /// Fails fast with `ModelUnavailable` when any artifact is missing.
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let text_path = config.model_dir.join("text_model.onnx");
        let vision_path = config.model_dir.join("vision_model.onnx");
        let tokenizer_path = config.model_dir.join("tokenizer.json");

        for path in [&text_path, &vision_path, &tokenizer_path] {
            if !path.exists() {
                return Err(Error::ModelUnavailable(format!(
                    "model artifact not found at {}",
                    path.display()
                )));
            }
        }

        let text_session = load_session(&text_path)?;
        let vision_session = load_session(&vision_path)?;
        tracing::info!(dir = %config.model_dir.display(), "CLIP ONNX sessions loaded");

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| Error::ModelUnavailable(format!("failed to load tokenizer: {e}")))?;

        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: config.max_tokens,
                ..Default::default()
            }))
            .map_err(|e| Error::ModelUnavailable(format!("failed to set truncation: {e}")))?;

        tokenizer.with_padding(Some(tokenizers::PaddingParams {
            strategy: tokenizers::PaddingStrategy::BatchLongest,
            ..Default::default()
        }));

        Ok(Self {
            text_session: Mutex::new(text_session),
            vision_session: Mutex::new(vision_session),
            tokenizer,
            dimensions: config.dimensions,
            image_size: config.image_size,
        })
    }

    fn run_text_tower(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::ModelUnavailable(format!("tokenization failed: {e}")))?;

        let seq_len = encoding.get_ids().len();
        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();

        let shape = vec![1i64, seq_len as i64];
        let input_ids_tensor = Tensor::from_array((shape.clone(), input_ids.into_boxed_slice()))
            .map_err(|e| Error::ModelUnavailable(format!("tensor build failed: {e}")))?;
        let attention_mask_tensor =
            Tensor::from_array((shape, attention_mask.into_boxed_slice()))
                .map_err(|e| Error::ModelUnavailable(format!("tensor build failed: {e}")))?;

        let mut session = self
            .text_session
            .lock()
            .map_err(|e| Error::ModelUnavailable(format!("session lock poisoned: {e}")))?;

        let outputs = session
            .run(ort::inputs! {
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
            })
            .map_err(|e| Error::ModelUnavailable(format!("text inference failed: {e}")))?;

        // Projected pooled output. The name varies by export; fall back to index 0.
        let value = outputs
            .get("text_embeds")
            .unwrap_or_else(|| &outputs[0]);

        let embedding = extract_single_vector(value, self.dimensions)?;
        Ok(l2_normalize(&embedding))
    }

    fn run_vision_tower(&self, pixel_values: Vec<f32>) -> Result<Vec<f32>> {
        let side = self.image_size as i64;
        let shape = vec![1i64, 3, side, side];
        let pixel_tensor = Tensor::from_array((shape, pixel_values.into_boxed_slice()))
            .map_err(|e| Error::ModelUnavailable(format!("tensor build failed: {e}")))?;

        let mut session = self
            .vision_session
            .lock()
            .map_err(|e| Error::ModelUnavailable(format!("session lock poisoned: {e}")))?;

        let outputs = session
            .run(ort::inputs! {
                "pixel_values" => pixel_tensor,
            })
            .map_err(|e| Error::ModelUnavailable(format!("image inference failed: {e}")))?;

        let value = outputs
            .get("image_embeds")
            .unwrap_or_else(|| &outputs[0]);

        // Image vectors are returned as the model produces them, matching the
        // stored image_embedding field. Only text vectors are normalized.
        extract_single_vector(value, self.dimensions)
    }
}

#[async_trait]
impl EmbeddingProvider for ClipEmbedder {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        self.run_text_tower(text)
    }

    async fn embed_image(&self, path: &Path) -> Result<Vec<f32>> {
        let img = image::open(path)
            .map_err(|e| Error::InvalidInput(format!("cannot decode {}: {e}", path.display())))?;
        let pixel_values = preprocess_image(&img, self.image_size);
        self.run_vision_tower(pixel_values)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "clip"
    }
}

fn load_session(path: &Path) -> Result<Session> {
    Session::builder()
        .and_then(|b| b.with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3))
        .and_then(|b| b.with_intra_threads(4))
        .and_then(|b| b.commit_from_file(path))
        .map_err(|e| Error::ModelUnavailable(format!("failed to load {}: {e}", path.display())))
}

/// Resize to the model's square input resolution and lay out as a normalized
/// CHW tensor. No other visual augmentation is applied.
fn preprocess_image(img: &image::DynamicImage, size: u32) -> Vec<f32> {
    let resized = img
        .resize_exact(size, size, image::imageops::FilterType::Triangle)
        .to_rgb8();

    let pixels = size as usize * size as usize;
    let mut chw = vec![0.0f32; 3 * pixels];

    for (i, pixel) in resized.pixels().enumerate() {
        for c in 0..3 {
            let scaled = pixel.0[c] as f32 / 255.0;
            chw[c * pixels + i] = (scaled - CLIP_MEAN[c]) / CLIP_STD[c];
        }
    }

    chw
}

fn extract_single_vector(value: &ort::value::Value, dimensions: usize) -> Result<Vec<f32>> {
    let (shape, data) = value
        .try_extract_tensor::<f32>()
        .map_err(|e| Error::ModelUnavailable(format!("failed to extract embedding: {e}")))?;

    let dims: &[i64] = &shape;
    let expected = [1i64, dimensions as i64];
    if dims != &expected[..] {
        return Err(Error::ModelUnavailable(format!(
            "unexpected embedding shape {dims:?}, expected {expected:?}"
        )));
    }

    Ok(data.to_vec())
}

/// L2-normalize a vector. Returns the input unchanged if its norm is zero.
fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter().map(|x| x / norm).collect()
    } else {
        v.to_vec()
    }
}
