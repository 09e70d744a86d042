//! Error types for the trailhead RAG system

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the RAG pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Bad caller-supplied data (unreadable image, malformed metadata record)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Embedding or chat model call failed or the model is not loaded
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// LLM output could not be parsed into the expected structure
    #[error("failed to parse model output: {0}")]
    Parse(String),

    /// Index unreachable, auth rejected, or the query itself was refused
    #[error("search unavailable: {0}")]
    SearchUnavailable(String),

    /// Missing or inconsistent configuration (caught at startup)
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidInput(_) | Error::Parse(_) => StatusCode::BAD_REQUEST,
            Error::ModelUnavailable(_) | Error::SearchUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Error::Config(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(serde_json::json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
