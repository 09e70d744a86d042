//! Chat model provider trait

use async_trait::async_trait;

use crate::error::Result;

/// A single-turn chat completion backend.
///
/// Implementations:
/// - `OllamaChat`: local Ollama server
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send one user message and return the model's reply content.
    ///
    /// Temperature differs per call site: 0 for parameter extraction,
    /// 0.3 for answer synthesis.
    async fn chat(&self, prompt: &str, temperature: f32) -> Result<String>;

    /// Model name for logging
    fn model(&self) -> &str;
}
