//! Search parameter extraction from natural-language queries

use std::sync::Arc;

use crate::catalog::ParkCatalog;
use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::providers::ChatProvider;
use crate::types::SearchParameters;

/// Turns a user question into structured [`SearchParameters`] via a single
/// zero-temperature chat call. One attempt, no retry: any failure surfaces
/// as a typed error the orchestrator maps to "not understood".
pub struct ParameterExtractor {
    chat: Arc<dyn ChatProvider>,
    temperature: f32,
}

impl ParameterExtractor {
    pub fn new(chat: Arc<dyn ChatProvider>, config: &LlmConfig) -> Self {
        Self {
            chat,
            temperature: config.extraction_temperature,
        }
    }

    /// Extract parameters for one user query
    pub async fn extract(
        &self,
        user_query: &str,
        catalog: &ParkCatalog,
    ) -> Result<SearchParameters> {
        let prompt = build_extraction_prompt(user_query, catalog);
        let reply = self.chat.chat(&prompt, self.temperature).await?;
        parse_parameters(&reply)
    }
}

/// The extraction prompt: full catalog, the output schema, and a worked
/// example, ending with a JSON-only instruction.
fn build_extraction_prompt(user_query: &str, catalog: &ParkCatalog) -> String {
    format!(
        r#"You are going to extract data from a user query for a national parks search system.

Available National Parks:
{parks}

Extract the following information and format as JSON:
- topic: the main activity or interest (e.g., "hike", "walk dog", "camping")
- radius_km: estimated search radius in kilometers (default: 100 if not specified)
- region: specific state, city, or region mentioned
- reference_place: if a city is mentioned, include it (e.g., "Boston", "Denver")
- park_ids: list of park IDs that might be relevant based on location (use the exact park IDs from the list above)

Examples:
User query: "Where can I hike in Utah?"
Response: {{"topic": "hike", "radius_km": 100, "region": "Utah", "reference_place": null, "park_ids": ["arches_national_park", "canyonlands_national_park"]}}

Only respond with valid JSON. No additional text. If a city is mentioned use the State that city is in as the region.

User query: {query}
"#,
        parks = catalog.format_for_prompt(),
        query = user_query
    )
}

/// Parse the model's raw reply into parameters. Tolerates code fences and
/// prose around the JSON object; anything that does not deserialize into the
/// full schema is a `Parse` error.
fn parse_parameters(reply: &str) -> Result<SearchParameters> {
    let json_str = match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => reply,
    };

    serde_json::from_str(json_str).map_err(|e| {
        Error::Parse(format!(
            "extraction reply is not valid search parameters: {e}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_catalog_and_query() {
        let catalog = ParkCatalog::builtin();
        let prompt = build_extraction_prompt("Where can I hike in Utah?", &catalog);
        assert!(prompt.contains("- Arches National Park: Utah"));
        assert!(prompt.contains("- Katmai National Park: Alaska"));
        assert!(prompt.contains("User query: Where can I hike in Utah?"));
        assert!(prompt.contains("Only respond with valid JSON"));
    }

    #[test]
    fn test_parse_clean_json() {
        let reply = r#"{"topic": "hike", "radius_km": 100, "region": "Utah", "reference_place": null, "park_ids": ["arches_national_park"]}"#;
        let params = parse_parameters(reply).unwrap();
        assert_eq!(params.topic, "hike");
        assert_eq!(params.park_ids, vec!["arches_national_park"]);
    }

    #[test]
    fn test_parse_fenced_json() {
        let reply = "```json\n{\"topic\": \"camping\", \"park_ids\": []}\n```";
        let params = parse_parameters(reply).unwrap();
        assert_eq!(params.topic, "camping");
        assert_eq!(params.radius_km, 100.0);
    }

    #[test]
    fn test_parse_json_with_surrounding_prose() {
        let reply = "Here you go:\n{\"topic\": \"wildlife\"}\nHope that helps!";
        let params = parse_parameters(reply).unwrap();
        assert_eq!(params.topic, "wildlife");
    }

    #[test]
    fn test_parse_garbage_is_error() {
        let err = parse_parameters("I don't know what you mean").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_parse_incomplete_schema_is_error() {
        // Valid JSON, but no topic: never a partially-typed value
        let err = parse_parameters(r#"{"region": "Utah"}"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
