//! In-memory document store.
//!
//! Stores every collection in a `HashMap` wrapped in `Arc<RwLock<_>>`. Data is
//! not persisted and is lost when the store is dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use stowage::storage::InMemoryStore;
//!
//! let store = InMemoryStore::new();
//! // Use store for testing...
//! ```

mod store;

pub use store::InMemoryStore;
