//! Raw record shapes exchanged with the backing stores.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A flat, keyed mapping of field names to JSON values.
pub type Record = serde_json::Map<String, Value>;

/// Reserved key carrying the entity identifier in every record shape.
pub const ID_FIELD: &str = "_id";

/// Reserved key carrying the document version in store envelopes.
pub const VERSION_FIELD: &str = "_version";

/// Envelope key holding the nested source payload of a store response.
pub const SOURCE_FIELD: &str = "_source";

/// Envelope key holding a request body; never merged into an entity.
pub const BODY_FIELD: &str = "body";

/// Response envelope returned by a persistent store for a single document.
///
/// The envelope carries metadata (`_id`, `_version`, ...) next to the nested
/// source payload stored under [`SOURCE_FIELD`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreResponse {
    pub data: Record,
}

impl StoreResponse {
    /// Builds an envelope for the document `id` at `version`.
    pub fn new(id: impl Into<String>, version: u64, source: Value) -> Self {
        let mut data = Record::new();
        data.insert(ID_FIELD.to_string(), Value::String(id.into()));
        data.insert(VERSION_FIELD.to_string(), Value::from(version));
        data.insert(SOURCE_FIELD.to_string(), source);
        Self { data }
    }

    /// Wraps an already-built envelope.
    pub fn from_data(data: Record) -> Self {
        Self { data }
    }

    /// The document id, when the envelope carries one.
    pub fn id(&self) -> Option<&str> {
        self.data.get(ID_FIELD).and_then(Value::as_str)
    }

    /// The nested source payload; `Value::Null` when absent.
    pub fn source(&self) -> &Value {
        self.data.get(SOURCE_FIELD).unwrap_or(&Value::Null)
    }
}

/// A record as handed to the hydrator, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    /// A persistent-store envelope with a nested source payload.
    Wrapped(StoreResponse),
    /// A plain value, expected to be a keyed mapping.
    Flat(Value),
}

impl From<StoreResponse> for RawRecord {
    fn from(response: StoreResponse) -> Self {
        RawRecord::Wrapped(response)
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        RawRecord::Flat(value)
    }
}

impl From<Record> for RawRecord {
    fn from(record: Record) -> Self {
        RawRecord::Flat(Value::Object(record))
    }
}

/// Returns a short name for the kind of a JSON value, used in error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
