//! Index-resident document shape and field pruning

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// The exact field set a document may carry into the index. Metadata records
/// often hold extra fields (EXIF dumps, upload bookkeeping); everything
/// outside this set is dropped before write.
pub const ALLOWED_DOCUMENT_FIELDS: &[&str] = &[
    "photo_id",
    "title",
    "description",
    "geolocation",
    "image_filename",
    "generated_description",
    "text_embedding",
    "image_embedding",
];

/// Prune a metadata record to the allowed field set
pub fn prune_to_allowed_fields(record: &Map<String, Value>) -> Map<String, Value> {
    let mut pruned = Map::new();
    for &key in ALLOWED_DOCUMENT_FIELDS {
        if let Some(value) = record.get(key) {
            pruned.insert(key.to_string(), value.clone());
        }
    }
    pruned
}

/// Check the invariants a document must satisfy before it is written: both
/// embeddings present, non-empty, and of equal dimensionality.
pub fn validate_document(doc: &Map<String, Value>, dimensions: usize) -> Result<()> {
    let text_len = embedding_len(doc, "text_embedding")?;
    let image_len = embedding_len(doc, "image_embedding")?;

    if text_len != dimensions || image_len != dimensions {
        return Err(Error::InvalidInput(format!(
            "embedding dimensionality mismatch: text={}, image={}, expected={}",
            text_len, image_len, dimensions
        )));
    }

    Ok(())
}

fn embedding_len(doc: &Map<String, Value>, field: &str) -> Result<usize> {
    let values = doc
        .get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::InvalidInput(format!("document is missing {}", field)))?;

    if values.is_empty() {
        return Err(Error::InvalidInput(format!("{} is empty", field)));
    }

    Ok(values.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_with(extra: &[(&str, Value)]) -> Map<String, Value> {
        let mut record = json!({
            "photo_id": "p-001",
            "title": "Delicate Arch",
            "description": "Iconic freestanding arch",
            "geolocation": {"lat": 38.7436, "lon": -109.4993},
            "image_filename": "delicate_arch.jpg",
            "generated_description": "A sandstone arch at sunset"
        })
        .as_object()
        .cloned()
        .unwrap();
        for (key, value) in extra {
            record.insert(key.to_string(), value.clone());
        }
        record
    }

    #[test]
    fn test_prune_drops_unknown_fields() {
        let record = record_with(&[
            ("exif", json!({"iso": 100})),
            ("uploader", json!("someone")),
        ]);
        let pruned = prune_to_allowed_fields(&record);
        assert!(!pruned.contains_key("exif"));
        assert!(!pruned.contains_key("uploader"));
        assert!(pruned.contains_key("photo_id"));
        assert!(pruned.contains_key("geolocation"));
    }

    #[test]
    fn test_prune_keeps_embeddings() {
        let record = record_with(&[
            ("text_embedding", json!([0.1, 0.2])),
            ("image_embedding", json!([0.3, 0.4])),
        ]);
        let pruned = prune_to_allowed_fields(&record);
        assert_eq!(pruned.len(), 8);
    }

    #[test]
    fn test_validate_requires_both_embeddings() {
        let record = record_with(&[("text_embedding", json!([0.1, 0.2]))]);
        let err = validate_document(&record, 2).unwrap_err();
        assert!(err.to_string().contains("image_embedding"));
    }

    #[test]
    fn test_validate_rejects_dimension_mismatch() {
        let record = record_with(&[
            ("text_embedding", json!([0.1, 0.2, 0.3])),
            ("image_embedding", json!([0.3, 0.4])),
        ]);
        assert!(validate_document(&record, 3).is_err());

        let record = record_with(&[
            ("text_embedding", json!([0.1, 0.2])),
            ("image_embedding", json!([0.3, 0.4])),
        ]);
        assert!(validate_document(&record, 2).is_ok());
    }
}
