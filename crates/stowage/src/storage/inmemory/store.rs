//! In-memory store implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use stowage_core::record::{Record, StoreResponse};
use stowage_core::storage::{
    DocumentStore, MultiGetItem, PersistResult, Result, SearchQuery, SearchResult, StoreError,
};

use crate::storage::split_record;

/// A stored document and its version.
#[derive(Debug, Clone)]
struct StoredDocument {
    version: u64,
    source: Record,
}

impl StoredDocument {
    fn to_response(&self, id: &str) -> StoreResponse {
        StoreResponse::new(id, self.version, Value::Object(self.source.clone()))
    }
}

type Collection = BTreeMap<String, StoredDocument>;

/// In-memory document store for testing.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access. Each
/// collection is ordered by id so search results are deterministic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents held in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<StoreResponse> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .map(|document| document.to_response(id))
            .ok_or_else(|| StoreError::not_found(collection, id))
    }

    async fn mget(&self, collection: &str, ids: &[String]) -> Result<Vec<MultiGetItem>> {
        let collections = self.collections.read().await;
        let documents = collections.get(collection);
        Ok(ids
            .iter()
            .map(|id| match documents.and_then(|d| d.get(id)) {
                Some(document) => {
                    MultiGetItem::found(id.clone(), Value::Object(document.source.clone()))
                }
                None => MultiGetItem::missing(id.clone()),
            })
            .collect())
    }

    async fn upsert(&self, collection: &str, record: Record) -> Result<PersistResult> {
        let (id, source) = split_record(record)?;
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();
        let (version, created) = match documents.get_mut(&id) {
            Some(existing) => {
                existing.version += 1;
                existing.source = source;
                (existing.version, false)
            }
            None => {
                documents.insert(id.clone(), StoredDocument { version: 1, source });
                (1, true)
            }
        };

        Ok(PersistResult {
            id,
            version,
            created,
        })
    }

    async fn search(&self, collection: &str, query: &SearchQuery) -> Result<SearchResult> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(SearchResult::empty());
        };

        let matching: Vec<StoreResponse> = documents
            .iter()
            .filter(|(_, document)| query.matches(&document.source))
            .map(|(id, document)| document.to_response(id))
            .collect();
        let total = matching.len();

        Ok(SearchResult {
            hits: query.paginate(matching),
            total,
        })
    }
}
