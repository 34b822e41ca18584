//! Cache-aside reads.

use std::sync::Arc;

use serde_json::Value;

use stowage_core::cache::{Cache, Ttl};
use stowage_core::entity::Entity;
use stowage_core::hydrate::{hydrate, HydrationError};
use stowage_core::record::{Record, RawRecord, StoreResponse, ID_FIELD, SOURCE_FIELD};
use stowage_core::serialization::{decode_value, encode_record};
use stowage_core::storage::SearchQuery;

use super::background::{spawn_detached, BackgroundTask};
use super::persister::{rearm, write_bytes};
use super::{CacheOptions, Repository, Result};

/// One page of hydrated search hits.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage<E> {
    pub entities: Vec<E>,
    /// Number of matching documents across all pages.
    pub total: usize,
}

impl<E> SearchPage<E> {
    pub fn empty() -> Self {
        Self {
            entities: Vec::new(),
            total: 0,
        }
    }
}

impl<E: Entity> Repository<E> {
    /// Loads an entity, cache first. See [`Repository::load_with`].
    pub async fn load(&self, id: &str) -> Result<Option<E>> {
        self.load_with(id, &CacheOptions::default()).await
    }

    /// Loads an entity, cache first.
    ///
    /// A cache hit re-arms the key's TTL in the background. A miss falls back
    /// to the store; a record found there is written back into the cache in
    /// the background. Background failures go to the observer and never fail
    /// the load. Any other collaborator failure is returned.
    pub async fn load_with(&self, id: &str, options: &CacheOptions) -> Result<Option<E>> {
        let Some(cache) = &self.binding.cache else {
            return self.load_one_from_store(id).await;
        };
        let key = options.resolve_key(&self.binding.collection, id);
        let ttl = options.resolve_ttl(self.binding.ttl);

        if let Some(bytes) = cache.get(&key).await? {
            let entity = self.hydrate_cached(&bytes)?;
            tracing::trace!(collection = %self.binding.collection, id, key = %key, "Cache hit");
            self.spawn_refresh(Arc::clone(cache), key, ttl);
            return Ok(Some(entity));
        }

        tracing::trace!(collection = %self.binding.collection, id, key = %key, "Cache miss");
        let Some(entity) = self.load_one_from_store(id).await? else {
            return Ok(None);
        };
        self.spawn_write_back(Arc::clone(cache), key, ttl, &entity);
        Ok(Some(entity))
    }

    /// Loads an entity from the cache alone, without touching its TTL.
    ///
    /// `None` on a miss or when no cache is configured.
    pub async fn load_from_cache(&self, id: &str, options: &CacheOptions) -> Result<Option<E>> {
        let Some(cache) = &self.binding.cache else {
            return Ok(None);
        };
        let key = options.resolve_key(&self.binding.collection, id);
        match cache.get(&key).await? {
            Some(bytes) => Ok(Some(self.hydrate_cached(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Loads an entity from the persistent store alone.
    ///
    /// `None` when the store reports the document missing or no store is
    /// configured.
    pub async fn load_one_from_store(&self, id: &str) -> Result<Option<E>> {
        let Some(store) = &self.binding.store else {
            return Ok(None);
        };
        match store.get(&self.binding.collection, id).await {
            Ok(response) => Ok(Some(self.hydrate_raw(response)?)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Loads several entities from the persistent store in one round trip.
    ///
    /// The cache is not consulted. Ids the store does not find are left out;
    /// the rest keep the store's order.
    pub async fn load_many(&self, ids: &[String]) -> Result<Vec<E>> {
        let Some(store) = &self.binding.store else {
            return Ok(Vec::new());
        };
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = store.mget(&self.binding.collection, ids).await?;
        let mut entities = Vec::with_capacity(items.len());
        for item in items.into_iter().filter(|item| item.found) {
            let mut data = Record::new();
            data.insert(ID_FIELD.to_string(), Value::String(item.id));
            data.insert(SOURCE_FIELD.to_string(), item.source.unwrap_or(Value::Null));
            entities.push(self.hydrate_raw(StoreResponse::from_data(data))?);
        }

        tracing::trace!(
            collection = %self.binding.collection,
            requested = ids.len(),
            found = entities.len(),
            "Loaded many from store"
        );
        Ok(entities)
    }

    /// Runs `query` against the store and hydrates every hit.
    ///
    /// An empty page when no store is configured.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchPage<E>> {
        let Some(store) = &self.binding.store else {
            return Ok(SearchPage::empty());
        };
        let result = store.search(&self.binding.collection, query).await?;
        let entities = result
            .hits
            .into_iter()
            .map(|hit| self.hydrate_raw(hit))
            .collect::<Result<Vec<_>>>()?;

        Ok(SearchPage {
            entities,
            total: result.total,
        })
    }

    fn hydrate_raw(&self, raw: impl Into<RawRecord>) -> Result<E> {
        let mut entity = self.fresh();
        hydrate(&mut entity, raw)?;
        Ok(entity)
    }

    fn hydrate_cached(&self, bytes: &[u8]) -> Result<E> {
        let value = decode_value(bytes).map_err(|e| HydrationError::Malformed {
            entity: E::KIND,
            reason: e.to_string(),
        })?;
        self.hydrate_raw(value)
    }

    fn spawn_refresh(&self, cache: Arc<dyn Cache>, key: String, ttl: Ttl) {
        let task_key = key.clone();
        spawn_detached(
            Arc::clone(&self.binding.observer),
            BackgroundTask::RefreshTtl,
            task_key,
            async move { rearm(cache.as_ref(), &key, ttl).await },
        );
    }

    fn spawn_write_back(&self, cache: Arc<dyn Cache>, key: String, ttl: Ttl, entity: &E) {
        let encoded = encode_record(&self.binding.serializer.to_cache_record(entity));
        let task_key = key.clone();
        spawn_detached(
            Arc::clone(&self.binding.observer),
            BackgroundTask::WriteBack,
            task_key,
            async move { write_bytes(cache.as_ref(), &key, &encoded?, ttl).await },
        );
    }
}
