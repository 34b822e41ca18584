use async_trait::async_trait;

use crate::record::{Record, StoreResponse};

use super::{MultiGetItem, PersistResult, Result, SearchQuery, SearchResult};

/// Durable, authoritative document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Gets a document by id.
    ///
    /// A missing document is reported as [`super::StoreError::NotFound`].
    async fn get(&self, collection: &str, id: &str) -> Result<StoreResponse>;

    /// Gets several documents at once, one item per requested id.
    async fn mget(&self, collection: &str, ids: &[String]) -> Result<Vec<MultiGetItem>>;

    /// Creates the document if absent, otherwise replaces it.
    ///
    /// The id is read from the record's `_id` field; when absent the store
    /// generates one and reports it in the result.
    async fn upsert(&self, collection: &str, record: Record) -> Result<PersistResult>;

    /// Searches a collection.
    async fn search(&self, collection: &str, query: &SearchQuery) -> Result<SearchResult>;
}
