//! The entity contract and the schema-agnostic [`Document`] entity.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::hydrate::HydrationError;
use crate::record::{Record, ID_FIELD};

/// A domain entity stored in a collection.
///
/// Hydration uses an explicit field projection: [`Entity::set_field`] maps
/// each known key to a typed setter and keeps unknown keys in whatever
/// side-map the entity provides for extension data.
pub trait Entity: Send + Sync + 'static {
    /// Name of the entity type, used in error messages.
    const KIND: &'static str;

    /// The entity identifier, once assigned.
    fn id(&self) -> Option<&str>;

    /// Applies one field of a raw record. The identifier arrives as `_id`.
    fn set_field(&mut self, field: &str, value: Value) -> Result<(), HydrationError>;

    /// Projects the entity into a flat record, including `_id` when set.
    fn to_record(&self) -> Record;
}

/// Deserializes `value` into `slot`, reporting failures as an invalid field.
pub fn assign<T: DeserializeOwned>(
    entity: &'static str,
    field: &str,
    slot: &mut T,
    value: Value,
) -> Result<(), HydrationError> {
    *slot = serde_json::from_value(value).map_err(|e| HydrationError::InvalidField {
        entity,
        field: field.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Assigns an identifier; only JSON strings are accepted.
pub fn assign_id(
    entity: &'static str,
    slot: &mut Option<String>,
    value: Value,
) -> Result<(), HydrationError> {
    match value {
        Value::String(id) => {
            *slot = Some(id);
            Ok(())
        }
        other => Err(HydrationError::InvalidField {
            entity,
            field: ID_FIELD.to_string(),
            reason: format!("expected a string, found {}", crate::record::value_kind(&other)),
        }),
    }
}

/// An entity with no schema: an optional id plus arbitrary fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Option<String>,
    pub fields: Record,
}

impl Document {
    /// Creates an empty document with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            fields: Record::new(),
        }
    }

    /// Sets a field, returning the document.
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Returns a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

impl Entity for Document {
    const KIND: &'static str = "Document";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_field(&mut self, field: &str, value: Value) -> Result<(), HydrationError> {
        if field == ID_FIELD {
            return assign_id(Self::KIND, &mut self.id, value);
        }
        self.fields.insert(field.to_string(), value);
        Ok(())
    }

    fn to_record(&self) -> Record {
        let mut record = self.fields.clone();
        if let Some(id) = &self.id {
            record.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        }
        record
    }
}
