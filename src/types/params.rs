//! Structured search parameters extracted from a user question

use serde::{Deserialize, Serialize};

fn default_radius_km() -> f64 {
    100.0
}

/// Parameters the extraction model produces for one user query.
///
/// Parsing is all-or-nothing: the orchestrator either gets a fully typed
/// value or a parse error, never a partially filled struct. `topic` is the
/// only required field; the rest carry the defaults the extraction prompt
/// documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchParameters {
    /// The activity or interest being searched for ("hike", "camping")
    pub topic: String,

    /// Search radius around each park anchor, in kilometers
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,

    /// State or region mentioned in the query, if any
    #[serde(default)]
    pub region: Option<String>,

    /// City mentioned in the query, if any
    #[serde(default)]
    pub reference_place: Option<String>,

    /// Candidate park ids, in the model's preference order. Empty means no
    /// location constraint was found; the orchestrator then searches the
    /// whole catalog.
    #[serde(default)]
    pub park_ids: Vec<String>,
}

impl SearchParameters {
    /// Radius rendered the way the geo-distance filter expects it ("100km")
    pub fn radius(&self) -> String {
        format!("{}km", self.radius_km)
    }
}
