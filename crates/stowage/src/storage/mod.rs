//! Persistent store implementations.
//!
//! This module provides concrete implementations of the [`DocumentStore`]
//! trait defined in `stowage_core::storage`.
//!
//! # Feature Flags
//!
//! - always built: in-memory store, for tests and cache-less experiments
//! - `sqlite` (default): SQLite store using `rusqlite` and `tokio-rusqlite`
//!
//! [`DocumentStore`]: stowage_core::storage::DocumentStore

pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use inmemory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use serde_json::Value;
use stowage_core::record::{Record, ID_FIELD, VERSION_FIELD};
use stowage_core::storage::{Result, StoreError};

/// Splits an upsert record into its id and the source payload to store.
///
/// Store-owned metadata (`_id`, `_version`) never lands in the payload. The id
/// is `None` when the record does not carry one.
pub(crate) fn split_record(mut record: Record) -> Result<(Option<String>, Record)> {
    record.remove(VERSION_FIELD);
    let id = match record.remove(ID_FIELD) {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) if !id.is_empty() => Some(id),
        Some(Value::String(_)) => {
            return Err(StoreError::InvalidData("_id must not be empty".to_string()))
        }
        Some(_) => return Err(StoreError::InvalidData("_id must be a string".to_string())),
    };
    Ok((id, record))
}
