//! Static catalog of searchable park locations
//!
//! The catalog is human-curated and loaded once at process start. Hit
//! annotation and prompt rendering both key off it, so every park id that
//! appears downstream is guaranteed to resolve here.

use serde::Serialize;

/// A geographic point (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// One catalog entry
#[derive(Debug, Clone, Serialize)]
pub struct Park {
    /// Stable identifier, e.g. `arches_national_park`
    pub id: String,
    /// Anchor coordinates used for geo-filtered search
    pub coordinates: GeoPoint,
    /// US state the park sits in
    pub region: String,
}

impl Park {
    fn new(id: &str, lat: f64, lon: f64, region: &str) -> Self {
        Self {
            id: id.to_string(),
            coordinates: GeoPoint { lat, lon },
            region: region.to_string(),
        }
    }

    /// Human-readable name derived from the id: `arches_national_park`
    /// becomes `Arches National Park`.
    pub fn display_name(&self) -> String {
        self.id
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The full park catalog, in insertion order
#[derive(Debug, Clone)]
pub struct ParkCatalog {
    parks: Vec<Park>,
}

impl ParkCatalog {
    /// Build the built-in catalog
    pub fn builtin() -> Self {
        Self {
            parks: vec![
                Park::new("mt_rainier_national_park", 46.8523, -121.7603, "Washington"),
                Park::new("crater_lake_national_park", 42.8684, -122.1685, "Oregon"),
                Park::new("death_valley_national_park", 36.5054, -117.0794, "California"),
                Park::new("grand_canyon_national_park", 36.0544, -112.1401, "Arizona"),
                Park::new("arches_national_park", 38.7331, -109.5925, "Utah"),
                Park::new("grand_teton_national_park", 43.7904, -110.6818, "Wyoming"),
                Park::new("yellowstone_national_park", 44.4280, -110.5885, "Wyoming"),
                Park::new("katmai_national_park", 58.5969, -155.0063, "Alaska"),
                Park::new(
                    "great_smoky_mountains_national_park",
                    35.6118,
                    -83.4895,
                    "Tennessee",
                ),
                Park::new("antietam_national_battlefield", 39.4751, -77.7411, "Maryland"),
                Park::new("canyonlands_national_park", 38.2619, -109.8782, "Utah"),
            ],
        }
    }

    /// Build a catalog from explicit entries (tests, alternate deployments)
    pub fn from_parks(parks: Vec<Park>) -> Self {
        Self { parks }
    }

    /// Look up a park by id
    pub fn get(&self, id: &str) -> Option<&Park> {
        self.parks.iter().find(|p| p.id == id)
    }

    /// All parks, in catalog order
    pub fn parks(&self) -> &[Park] {
        &self.parks
    }

    /// All park ids, in catalog order
    pub fn ids(&self) -> Vec<String> {
        self.parks.iter().map(|p| p.id.clone()).collect()
    }

    /// Parks in a given region (case-insensitive)
    pub fn in_region(&self, region: &str) -> Vec<&Park> {
        self.parks
            .iter()
            .filter(|p| p.region.eq_ignore_ascii_case(region))
            .collect()
    }

    /// Number of catalog entries
    pub fn len(&self) -> usize {
        self.parks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parks.is_empty()
    }

    /// Render the catalog for the extraction prompt, one park per line:
    /// `- Arches National Park: Utah (Lat: 38.7331, Lon: -109.5925)`
    pub fn format_for_prompt(&self) -> String {
        self.parks
            .iter()
            .map(|p| {
                format!(
                    "- {}: {} (Lat: {}, Lon: {})",
                    p.display_name(),
                    p.region,
                    p.coordinates.lat,
                    p.coordinates.lon
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ParkCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
