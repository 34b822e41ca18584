//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and store types.
//! These are testable in isolation without database access.

use chrono::{SecondsFormat, Utc};
use rusqlite::Row;
use serde_json::Value;

use stowage_core::record::{Record, StoreResponse};
use stowage_core::storage::{Result, StoreError};

/// A raw document row: id, version, JSON source.
pub type DocumentRow = (String, i64, String);

/// Convert a SQLite row to a document row.
///
/// Expected columns: id, version, source
pub fn row_to_document(row: &Row) -> rusqlite::Result<DocumentRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

/// Parses a stored JSON source payload.
pub fn parse_source(source: &str) -> Result<Record> {
    match serde_json::from_str(source) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(_) => Err(StoreError::InvalidData(
            "stored source is not a JSON object".to_string(),
        )),
        Err(e) => Err(StoreError::Serialization(e.to_string())),
    }
}

/// Serializes a source payload for storage.
pub fn format_source(source: &Record) -> Result<String> {
    serde_json::to_string(source).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Converts a stored version to the public representation.
pub fn version_from_sql(version: i64) -> u64 {
    u64::try_from(version).unwrap_or(0)
}

/// Builds a store envelope from a document row.
pub fn document_to_response((id, version, source): DocumentRow) -> Result<StoreResponse> {
    let source = parse_source(&source)?;
    Ok(StoreResponse::new(
        id,
        version_from_sql(version),
        Value::Object(source),
    ))
}

/// Current time as stored in `updated_at`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
