//! Provider abstractions for embeddings and chat
//!
//! Trait seams let the orchestrator and tests substitute fakes for the
//! CLIP/Ollama backends.

pub mod chat;
pub mod clip;
pub mod embedding;
pub mod ollama;

pub use chat::ChatProvider;
pub use clip::ClipEmbedder;
pub use embedding::EmbeddingProvider;
pub use ollama::OllamaChat;
