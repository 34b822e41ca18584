//! Projections of entities into store records, and the cache byte codec.
//!
//! Records are stored in the cache as JSON, which keeps cache values human
//! readable and easy to inspect.

use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;

use crate::entity::Entity;
use crate::record::Record;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Projects an entity into the record written to each backing store.
///
/// Both projections must be pure and total. The defaults return the entity's
/// own record unchanged.
pub trait RecordSerializer<E: Entity>: Send + Sync {
    /// Record written to the cache.
    fn to_cache_record(&self, entity: &E) -> Record {
        entity.to_record()
    }

    /// Record written to the persistent store.
    fn to_store_record(&self, entity: &E) -> Record {
        entity.to_record()
    }
}

/// Writes the entity's record unchanged to both stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentitySerializer;

impl<E: Entity> RecordSerializer<E> for IdentitySerializer {}

/// Drops configured fields from one or both projections.
///
/// Typical uses are keeping derived fields out of the persistent store and
/// transient fields out of the cache.
#[derive(Debug, Clone, Default)]
pub struct ProjectionSerializer {
    cache_omit: HashSet<String>,
    store_omit: HashSet<String>,
}

impl ProjectionSerializer {
    /// Creates a serializer that omits nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Omits `field` from cache records.
    pub fn omit_from_cache(mut self, field: impl Into<String>) -> Self {
        self.cache_omit.insert(field.into());
        self
    }

    /// Omits `field` from persistent-store records.
    pub fn omit_from_store(mut self, field: impl Into<String>) -> Self {
        self.store_omit.insert(field.into());
        self
    }
}

fn without(mut record: Record, omit: &HashSet<String>) -> Record {
    record.retain(|field, _| !omit.contains(field));
    record
}

impl<E: Entity> RecordSerializer<E> for ProjectionSerializer {
    fn to_cache_record(&self, entity: &E) -> Record {
        without(entity.to_record(), &self.cache_omit)
    }

    fn to_store_record(&self, entity: &E) -> Record {
        without(entity.to_record(), &self.store_omit)
    }
}

/// Serializes a record to JSON bytes.
pub fn encode_record(record: &Record) -> Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a value.
///
/// The value is not required to be an object; the hydrator rejects anything
/// that is not a keyed mapping.
pub fn decode_value(bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
