//! Hybrid retrieval query construction
//!
//! One user topic against one park anchor becomes three retrieval branches:
//! a geo-filtered boolean query with lexical `should` boosts, a k-NN search
//! over the text-embedding field, and a k-NN search over the image-embedding
//! field. The image branch deliberately reuses the *text* query vector; the
//! shared CLIP embedding space is what makes that comparison meaningful.
//! The branches are combined by reciprocal rank fusion, either server-side
//! (`retriever.rrf`) or client-side over independent branch searches.

use serde_json::{json, Value};

use crate::catalog::GeoPoint;
use crate::config::SearchConfig;

/// Fields projected into each hit's `_source`
const SOURCE_FIELDS: [&str; 2] = ["image_filename", "generated_description"];

/// A hybrid query bound to one park anchor
#[derive(Debug, Clone)]
pub struct HybridQuery {
    anchor: GeoPoint,
    radius: String,
    topic: String,
    topic_embedding: Vec<f32>,
    knn_k: usize,
    num_candidates: usize,
    result_size: usize,
}

impl HybridQuery {
    /// Build a query for one park.
    ///
    /// `radius` is an Elasticsearch distance string ("100km"); the topic
    /// embedding is computed once per user query and shared across parks.
    pub fn new(
        anchor: GeoPoint,
        radius: &str,
        topic: &str,
        topic_embedding: &[f32],
        config: &SearchConfig,
    ) -> Self {
        Self {
            anchor,
            radius: radius.to_string(),
            topic: topic.to_string(),
            topic_embedding: topic_embedding.to_vec(),
            knn_k: config.knn_k,
            num_candidates: config.num_candidates,
            result_size: config.result_size,
        }
    }

    /// Hard geo constraint shared by all three branches
    fn geo_filter(&self) -> Value {
        json!({
            "geo_distance": {
                "distance": self.radius,
                "geolocation": { "lat": self.anchor.lat, "lon": self.anchor.lon }
            }
        })
    }

    /// The boolean query of the standard branch: the geo filter is mandatory,
    /// the lexical clauses only boost rank. A document inside the radius
    /// matches even when neither text field mentions the topic.
    fn standard_query(&self) -> Value {
        json!({
            "bool": {
                "filter": [ self.geo_filter() ],
                "should": [
                    { "match": { "generated_description": self.topic } },
                    { "match": { "description": self.topic } }
                ]
            }
        })
    }

    /// A knn retriever over the given vector field
    fn knn_branch(&self, field: &str) -> Value {
        json!({
            "filter": self.geo_filter(),
            "field": field,
            "query_vector": self.topic_embedding,
            "k": self.knn_k,
            "num_candidates": self.num_candidates
        })
    }

    /// The single-request form: three retrievers under `retriever.rrf`,
    /// fused by the cluster.
    pub fn to_rrf_request(&self) -> Value {
        json!({
            "_source": SOURCE_FIELDS,
            "retriever": {
                "rrf": {
                    "retrievers": [
                        { "standard": { "query": self.standard_query() } },
                        { "knn": self.knn_branch("text_embedding") },
                        { "knn": self.knn_branch("image_embedding") }
                    ]
                }
            },
            "size": self.result_size
        })
    }

    /// The three branches as standalone search bodies, for clusters without
    /// the RRF retriever. Each branch retrieves its own ranked list; the
    /// caller fuses them locally.
    pub fn branch_requests(&self) -> [Value; 3] {
        [
            json!({
                "_source": SOURCE_FIELDS,
                "query": self.standard_query(),
                "size": self.knn_k
            }),
            json!({
                "_source": SOURCE_FIELDS,
                "knn": self.knn_branch("text_embedding")
            }),
            json!({
                "_source": SOURCE_FIELDS,
                "knn": self.knn_branch("image_embedding")
            }),
        ]
    }

    /// Final result size after fusion
    pub fn result_size(&self) -> usize {
        self.result_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_query() -> HybridQuery {
        let config = SearchConfig::default();
        HybridQuery::new(
            GeoPoint {
                lat: 38.7331,
                lon: -109.5925,
            },
            "100km",
            "hike",
            &[0.1, 0.2, 0.3],
            &config,
        )
    }

    #[test]
    fn test_rrf_request_has_three_retrievers() {
        let body = test_query().to_rrf_request();
        let retrievers = body["retriever"]["rrf"]["retrievers"].as_array().unwrap();
        assert_eq!(retrievers.len(), 3);
        assert!(retrievers[0]["standard"].is_object());
        assert_eq!(retrievers[1]["knn"]["field"], "text_embedding");
        assert_eq!(retrievers[2]["knn"]["field"], "image_embedding");
        assert_eq!(body["size"], 3);
    }

    #[test]
    fn test_source_projection() {
        let body = test_query().to_rrf_request();
        let source: Vec<&str> = body["_source"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(source, vec!["image_filename", "generated_description"]);
    }

    #[test]
    fn test_geo_filter_in_every_branch() {
        let body = test_query().to_rrf_request();
        let retrievers = body["retriever"]["rrf"]["retrievers"].as_array().unwrap();

        let standard_filter =
            &retrievers[0]["standard"]["query"]["bool"]["filter"][0]["geo_distance"];
        assert_eq!(standard_filter["distance"], "100km");
        assert_eq!(standard_filter["geolocation"]["lat"], 38.7331);
        assert_eq!(standard_filter["geolocation"]["lon"], -109.5925);

        for knn in &retrievers[1..] {
            let filter = &knn["knn"]["filter"]["geo_distance"];
            assert_eq!(filter["distance"], "100km");
            assert_eq!(filter["geolocation"]["lat"], 38.7331);
        }
    }

    #[test]
    fn test_lexical_clauses_are_soft() {
        let body = test_query().to_rrf_request();
        let bool_query =
            &body["retriever"]["rrf"]["retrievers"][0]["standard"]["query"]["bool"];
        let should = bool_query["should"].as_array().unwrap();
        assert_eq!(should.len(), 2);
        assert_eq!(should[0]["match"]["generated_description"], "hike");
        assert_eq!(should[1]["match"]["description"], "hike");
        // No minimum_should_match: the filter alone admits a document
        assert!(bool_query.get("minimum_should_match").is_none());
    }

    #[test]
    fn test_image_branch_reuses_text_vector() {
        let body = test_query().to_rrf_request();
        let retrievers = body["retriever"]["rrf"]["retrievers"].as_array().unwrap();
        let text_vector = &retrievers[1]["knn"]["query_vector"];
        let image_vector = &retrievers[2]["knn"]["query_vector"];
        assert_eq!(text_vector, image_vector);
        assert_eq!(retrievers[1]["knn"]["k"], 10);
        assert_eq!(retrievers[1]["knn"]["num_candidates"], 100);
    }

    #[test]
    fn test_branch_requests_shapes() {
        let [standard, text_knn, image_knn] = test_query().branch_requests();
        assert!(standard["query"]["bool"].is_object());
        assert_eq!(standard["size"], 10);
        assert_eq!(text_knn["knn"]["field"], "text_embedding");
        assert_eq!(image_knn["knn"]["field"], "image_embedding");
        assert_eq!(
            text_knn["knn"]["query_vector"],
            image_knn["knn"]["query_vector"]
        );
    }
}
