//! API routes
//!
//! The fixed fallback strings for non-answer outcomes live here: components
//! report typed outcomes and the presentation layer chooses the words.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{AnswerKind, RetrievalHit, SearchParameters};

/// User-visible text for a query the extractor could not parse
pub const NOT_UNDERSTOOD_MESSAGE: &str =
    "I'm sorry, I couldn't understand your query. Please try rephrasing it.";

/// User-visible text when the synthesis model call failed
pub const SYNTHESIS_FAILED_MESSAGE: &str =
    "I apologize, but I encountered an error while generating a response to your query.";

/// User-visible text when the model returned empty content
pub const EMPTY_REPLY_MESSAGE: &str =
    "I wasn't able to generate a proper response. Please try rephrasing your question.";

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub answer: String,
    pub hits: Vec<RetrievalHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<SearchParameters>,
}

/// POST /api/query
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let outcome = state.orchestrator().handle(&request.question).await?;

    let answer = match outcome.answer {
        AnswerKind::Answer(text) => text,
        AnswerKind::NotUnderstood => NOT_UNDERSTOOD_MESSAGE.to_string(),
        AnswerKind::SynthesisFailed => SYNTHESIS_FAILED_MESSAGE.to_string(),
        AnswerKind::EmptyReply => EMPTY_REPLY_MESSAGE.to_string(),
    };

    Ok(Json(QueryResponse {
        answer,
        hits: outcome.hits,
        params: outcome.params,
    }))
}

/// GET /api/info
pub async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "trailhead-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Multi-modal RAG for national-park activity search",
        "index": state.config().search.index,
        "endpoints": {
            "POST /api/query": "Ask a national-parks question",
            "GET /api/info": "Service info",
            "GET /health": "Health check"
        }
    }))
}
