//! SQLite document store implementation.
//!
//! This module provides a SQLite-based implementation of the document store
//! using `rusqlite` for synchronous operations and `tokio-rusqlite` for async
//! wrapping. Every collection lives in one `documents` table keyed by
//! `(collection, id)`; source payloads are stored as JSON text.

mod conversions;
mod error;
mod schema;
mod store;

pub use store::SqliteStore;
