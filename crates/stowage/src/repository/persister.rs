//! Write-through persistence and explicit cache maintenance.

use serde_json::Value;

use stowage_core::cache::{Cache, Ttl};
use stowage_core::entity::Entity;
use stowage_core::record::ID_FIELD;
use stowage_core::serialization::encode_record;
use stowage_core::storage::PersistResult;

use super::{CacheOptions, Repository, RepositoryError, Result};

/// Writes `bytes` under `key`, with an expiry unless `ttl` is `Never`.
pub(crate) async fn write_bytes(cache: &dyn Cache, key: &str, bytes: &[u8], ttl: Ttl) -> Result<()> {
    match ttl.duration() {
        Some(duration) => cache.volatile_set(key, bytes, duration).await?,
        None => cache.set(key, bytes).await?,
    }
    Ok(())
}

/// Re-arms the expiry of `key`, or strips it when `ttl` is `Never`.
pub(crate) async fn rearm(cache: &dyn Cache, key: &str, ttl: Ttl) -> Result<()> {
    match ttl.duration() {
        Some(duration) => cache.expire(key, duration).await?,
        None => cache.persist(key).await?,
    }
    Ok(())
}

impl<E: Entity> Repository<E> {
    /// Upserts the entity's store projection, keyed by its id.
    ///
    /// The cache is left alone. Returns `None` when no store is configured.
    /// An entity without an id gets one from the store, reported in the
    /// result; the entity itself is not modified.
    pub async fn persist_to_store(&self, entity: &E) -> Result<Option<PersistResult>> {
        let Some(store) = &self.binding.store else {
            return Ok(None);
        };
        let mut record = self.binding.serializer.to_store_record(entity);
        if let Some(id) = entity.id() {
            record.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        }

        let result = store.upsert(&self.binding.collection, record).await?;
        tracing::debug!(
            collection = %self.binding.collection,
            id = %result.id,
            version = result.version,
            created = result.created,
            "Persisted to store"
        );
        Ok(Some(result))
    }

    /// Writes the entity into the cache under its default key and TTL.
    pub async fn persist_to_cache(&self, entity: &E) -> Result<()> {
        self.persist_to_cache_with(entity, &CacheOptions::default())
            .await
    }

    /// Writes the entity's cache projection, replacing any previous value.
    ///
    /// A `Never` TTL stores the record without expiry. No-op without a cache.
    pub async fn persist_to_cache_with(&self, entity: &E, options: &CacheOptions) -> Result<()> {
        let Some(cache) = &self.binding.cache else {
            return Ok(());
        };
        let key = self.entity_key(entity, options)?;
        let ttl = options.resolve_ttl(self.binding.ttl);
        let bytes = encode_record(&self.binding.serializer.to_cache_record(entity))?;

        write_bytes(cache.as_ref(), &key, &bytes, ttl).await?;
        tracing::debug!(collection = %self.binding.collection, key = %key, %ttl, "Persisted to cache");
        Ok(())
    }

    pub async fn refresh_ttl(&self, entity: &E) -> Result<()> {
        self.refresh_ttl_with(entity, &CacheOptions::default()).await
    }

    /// Re-arms the expiry of the entity's cache key without rewriting it.
    ///
    /// The TTL resolves like any other operation: an earlier override is not
    /// remembered. No-op without a cache.
    pub async fn refresh_ttl_with(&self, entity: &E, options: &CacheOptions) -> Result<()> {
        let Some(cache) = &self.binding.cache else {
            return Ok(());
        };
        let key = self.entity_key(entity, options)?;
        let ttl = options.resolve_ttl(self.binding.ttl);

        rearm(cache.as_ref(), &key, ttl).await?;
        tracing::trace!(collection = %self.binding.collection, key = %key, %ttl, "TTL refreshed");
        Ok(())
    }

    /// Deletes the entity's cache key. No-op without a cache.
    pub async fn evict_from_cache(&self, entity: &E, options: &CacheOptions) -> Result<()> {
        let Some(cache) = &self.binding.cache else {
            return Ok(());
        };
        let key = self.entity_key(entity, options)?;

        cache.delete(&key).await?;
        tracing::debug!(collection = %self.binding.collection, key = %key, "Evicted from cache");
        Ok(())
    }

    fn entity_key(&self, entity: &E, options: &CacheOptions) -> Result<String> {
        if let Some(key) = &options.key {
            return Ok(key.clone());
        }
        match entity.id() {
            Some(id) => Ok(options.resolve_key(&self.binding.collection, id)),
            None => Err(RepositoryError::MissingId {
                collection: self.binding.collection.clone(),
            }),
        }
    }
}
