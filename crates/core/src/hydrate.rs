//! Hydration of raw store records into entities.
//!
//! Both record shapes (store envelopes and flat mappings) are normalized to a
//! single flat [`Record`] which is then merged field by field onto the target
//! entity. Hydration is a merge, not a reset: fields absent from the record
//! keep whatever value the target already holds.

use serde_json::Value;
use thiserror::Error;

use crate::entity::Entity;
use crate::record::{value_kind, RawRecord, Record, BODY_FIELD, SOURCE_FIELD};

/// Errors raised while turning a raw record into an entity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HydrationError {
    #[error("Error hydrating {entity}: data is not an object (found {found})")]
    NotAnObject {
        entity: &'static str,
        found: &'static str,
    },
    #[error("Error hydrating {entity}: invalid value for field '{field}': {reason}")]
    InvalidField {
        entity: &'static str,
        field: String,
        reason: String,
    },
    #[error("Error hydrating {entity}: malformed payload: {reason}")]
    Malformed {
        entity: &'static str,
        reason: String,
    },
}

/// Result type for hydration.
pub type Result<T> = std::result::Result<T, HydrationError>;

/// Flattens a raw record into a single keyed mapping.
///
/// Envelopes contribute their source payload first, then every envelope field
/// except the payload containers, so envelope metadata such as `_id` wins over
/// a same-named source field. A null payload counts as empty.
pub fn normalize<E: Entity>(raw: RawRecord) -> Result<Record> {
    match raw {
        RawRecord::Wrapped(response) => {
            let mut data = response.data;
            let mut flat = match data.remove(SOURCE_FIELD) {
                Some(Value::Object(source)) => source,
                None | Some(Value::Null) => Record::new(),
                Some(other) => {
                    return Err(HydrationError::NotAnObject {
                        entity: E::KIND,
                        found: value_kind(&other),
                    })
                }
            };
            data.remove(BODY_FIELD);
            flat.extend(data);
            Ok(flat)
        }
        RawRecord::Flat(Value::Object(record)) => Ok(record),
        RawRecord::Flat(other) => Err(HydrationError::NotAnObject {
            entity: E::KIND,
            found: value_kind(&other),
        }),
    }
}

/// Copies every field of `raw` onto `target`.
///
/// There is no whitelist: each key is handed to [`Entity::set_field`], which
/// decides how to store it. Only `target` is mutated.
pub fn hydrate<E: Entity>(target: &mut E, raw: impl Into<RawRecord>) -> Result<()> {
    let record = normalize::<E>(raw.into())?;
    for (field, value) in record {
        target.set_field(&field, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Document;
    use crate::record::{StoreResponse, ID_FIELD};
    use serde_json::json;

    #[test]
    fn test_hydrate_flat_record() {
        let mut doc = Document::default();
        hydrate(&mut doc, json!({"_id": "u1", "name": "Ann"})).unwrap();

        assert_eq!(doc.id.as_deref(), Some("u1"));
        assert_eq!(doc.fields.get("name"), Some(&json!("Ann")));
    }

    #[test]
    fn test_hydrate_wrapped_response_merges_metadata() {
        let mut data = StoreResponse::new("u1", 2, json!({"name": "Ann"})).data;
        data.insert("body".to_string(), json!({"ignored": true}));
        let mut doc = Document::default();

        hydrate(&mut doc, StoreResponse::from_data(data)).unwrap();

        assert_eq!(doc.id.as_deref(), Some("u1"));
        assert_eq!(doc.fields.get("name"), Some(&json!("Ann")));
        assert_eq!(doc.fields.get("_version"), Some(&json!(2)));
        assert!(!doc.fields.contains_key("_source"));
        assert!(!doc.fields.contains_key("body"));
    }

    #[test]
    fn test_envelope_id_wins_over_source_id() {
        let response = StoreResponse::new("u1", 1, json!({"_id": "stale", "name": "Ann"}));
        let record = normalize::<Document>(response.into()).unwrap();

        assert_eq!(record.get(ID_FIELD), Some(&json!("u1")));
    }

    #[test]
    fn test_wrapped_response_with_null_source() {
        let response = StoreResponse::new("u1", 1, Value::Null);
        let mut doc = Document::default();

        hydrate(&mut doc, response).unwrap();

        assert_eq!(doc.id.as_deref(), Some("u1"));
    }

    #[test]
    fn test_wrapped_response_with_scalar_source_fails() {
        let response = StoreResponse::new("u1", 1, json!("not a document"));
        let mut doc = Document::default();

        let err = hydrate(&mut doc, response).unwrap_err();

        assert_eq!(
            err,
            HydrationError::NotAnObject {
                entity: "Document",
                found: "string"
            }
        );
    }

    #[test]
    fn test_hydrate_scalar_fails() {
        let mut doc = Document::default();
        let err = hydrate(&mut doc, json!(42)).unwrap_err();

        assert!(matches!(err, HydrationError::NotAnObject { found: "number", .. }));
        assert_eq!(
            err.to_string(),
            "Error hydrating Document: data is not an object (found number)"
        );
    }

    #[test]
    fn test_hydrate_null_fails() {
        let mut doc = Document::default();
        let err = hydrate(&mut doc, Value::Null).unwrap_err();

        assert!(matches!(err, HydrationError::NotAnObject { found: "null", .. }));
    }

    #[test]
    fn test_hydrate_is_a_merge() {
        let mut doc = Document::default();

        hydrate(&mut doc, json!({"a": 1, "b": 2})).unwrap();
        hydrate(&mut doc, json!({"b": 3})).unwrap();

        assert_eq!(doc.fields.get("a"), Some(&json!(1)));
        assert_eq!(doc.fields.get("b"), Some(&json!(3)));
    }

    #[test]
    fn test_hydrate_copies_unknown_fields() {
        let mut doc = Document::default();
        hydrate(&mut doc, json!({"anything": {"nested": [1, 2]}})).unwrap();

        assert_eq!(doc.fields.get("anything"), Some(&json!({"nested": [1, 2]})));
    }

    #[test]
    fn test_invalid_id_is_rejected() {
        let mut doc = Document::default();
        let err = hydrate(&mut doc, json!({"_id": 7})).unwrap_err();

        assert!(matches!(err, HydrationError::InvalidField { ref field, .. } if field == "_id"));
    }
}
