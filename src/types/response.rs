//! Query outcome types returned by the orchestrator

use serde::Serialize;

use super::hit::RetrievalHit;
use super::params::SearchParameters;

/// What the answer stage produced.
///
/// Components return typed outcomes; the user-facing fallback strings for the
/// non-`Answer` variants belong to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "text")]
pub enum AnswerKind {
    /// A synthesized answer grounded in the retrieved hits
    Answer(String),
    /// Parameter extraction failed; the query was not understood
    NotUnderstood,
    /// The synthesis model call failed
    SynthesisFailed,
    /// The model replied, but with empty content
    EmptyReply,
}

/// Everything the orchestrator hands back for one user query
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub answer: AnswerKind,
    pub hits: Vec<RetrievalHit>,
    /// The extracted parameters, absent when extraction failed
    pub params: Option<SearchParameters>,
}

impl QueryOutcome {
    /// Outcome for a query the extractor could not turn into parameters
    pub fn not_understood() -> Self {
        Self {
            answer: AnswerKind::NotUnderstood,
            hits: Vec::new(),
            params: None,
        }
    }
}
