mod error;
mod traits;
mod types;

pub use error::{Result, StoreError};
pub use traits::DocumentStore;
pub use types::{MultiGetItem, PersistResult, SearchQuery, SearchResult, DEFAULT_SEARCH_SIZE};
