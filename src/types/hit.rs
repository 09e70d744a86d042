//! Retrieval hit types

use serde::{Deserialize, Serialize};

use crate::catalog::{GeoPoint, Park};

/// The projected `_source` fields of an index hit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HitSource {
    #[serde(default)]
    pub image_filename: String,
    #[serde(default)]
    pub generated_description: String,
}

/// One ranked hit as returned by the search backend, before park annotation
#[derive(Debug, Clone, Deserialize)]
pub struct RawHit {
    /// Document id (`_id`)
    #[serde(rename = "_id")]
    pub id: String,
    /// Fused relevance score (`_score`)
    #[serde(rename = "_score")]
    pub score: f32,
    /// Projected source fields
    #[serde(rename = "_source", default)]
    pub source: HitSource,
}

/// A hit annotated with the park it was retrieved for.
///
/// `park_id` is always a catalog key: the orchestrator only annotates hits
/// produced by searching a catalog park.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalHit {
    pub score: f32,
    pub image_filename: String,
    pub generated_description: String,
    pub park_id: String,
    pub region: String,
    pub coordinates: GeoPoint,
}

impl RetrievalHit {
    /// Attach park context to a raw hit
    pub fn annotate(raw: RawHit, park: &Park) -> Self {
        Self {
            score: raw.score,
            image_filename: raw.source.image_filename,
            generated_description: raw.source.generated_description,
            park_id: park.id.clone(),
            region: park.region.clone(),
            coordinates: park.coordinates,
        }
    }
}
