//! Final answer synthesis from retrieved hits

use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::Result;
use crate::providers::ChatProvider;
use crate::types::{RetrievalHit, SearchParameters};

/// Descriptions are clipped to this many characters in the prompt
const SNIPPET_CHARS: usize = 200;

/// Produces the user-facing answer from the original question, the extracted
/// parameters, and the accumulated hits, at a moderate temperature for
/// natural prose. The prompt constrains the model to the supplied hits.
pub struct ResponseSynthesizer {
    chat: Arc<dyn ChatProvider>,
    temperature: f32,
}

impl ResponseSynthesizer {
    pub fn new(chat: Arc<dyn ChatProvider>, config: &LlmConfig) -> Self {
        Self {
            chat,
            temperature: config.synthesis_temperature,
        }
    }

    /// Synthesize one answer. Empty model output is returned as-is; the
    /// orchestrator decides what an empty reply means.
    pub async fn synthesize(
        &self,
        user_query: &str,
        hits: &[RetrievalHit],
        params: &SearchParameters,
    ) -> Result<String> {
        let prompt = build_synthesis_prompt(user_query, hits, params);
        self.chat.chat(&prompt, self.temperature).await
    }
}

fn format_hits(hits: &[RetrievalHit]) -> String {
    if hits.is_empty() {
        return "No results found for your query.".to_string();
    }

    let mut rendered = "Search Results:\n".to_string();
    for hit in hits {
        let snippet: String = hit.generated_description.chars().take(SNIPPET_CHARS).collect();
        rendered.push_str(&format!("   Title: {}\n", hit.image_filename));
        rendered.push_str(&format!("   Content: {}...\n", snippet));
        rendered.push_str(&format!("   Relevance Score: {}\n", hit.score));
    }
    rendered
}

fn build_synthesis_prompt(
    user_query: &str,
    hits: &[RetrievalHit],
    params: &SearchParameters,
) -> String {
    let reference_line = params
        .reference_place
        .as_deref()
        .map(|place| format!("- Reference Location: {place}\n"))
        .unwrap_or_default();

    format!(
        r#"You are a helpful assistant for national parks activities. Based on the search results below, provide a comprehensive and helpful response to the user's original query.

Original User Query: {query}

Search Parameters Used:
- Activity/Interest: {topic}
- Search Distance: {radius} km
- Location: {region}
{reference_line}
{results}

Instructions:
- Provide a natural, conversational response
- Recommend specific activities and locations based on the search results only
- Include practical information when available
- Do not suggest alternatives if no results were found
- Be enthusiastic and helpful about national parks experiences
- Keep the response focused and not too lengthy
- Structure your response separating your suggestions per national park
- Do not include anything about national parks that are not in the results

Response:"#,
        query = user_query,
        topic = params.topic,
        radius = params.radius_km,
        region = params.region.as_deref().unwrap_or("N/A"),
        reference_line = reference_line,
        results = format_hits(hits),
    )
}
