//! Opens the cache and store backends named by a [`Config`].

use std::sync::Arc;

use stowage_core::cache::Cache;
use stowage_core::storage::DocumentStore;

use crate::cache::MemoryCache;
use crate::config::{CacheBackend, Config, StoreBackend};
use crate::storage::InMemoryStore;

/// Opens the configured cache; `None` when caching is disabled.
pub async fn open_cache(config: &Config) -> anyhow::Result<Option<Arc<dyn Cache>>> {
    let cache: Arc<dyn Cache> = match config.cache_backend {
        CacheBackend::Disabled => return Ok(None),
        CacheBackend::Memory => Arc::new(MemoryCache::new(config.cache_max_entries)?),
        CacheBackend::Redis => open_redis(&config.redis_url).await?,
    };
    tracing::info!(backend = %config.cache_backend, "Cache opened");
    Ok(Some(cache))
}

/// Opens the configured store; `None` when persistence is disabled.
pub async fn open_store(config: &Config) -> anyhow::Result<Option<Arc<dyn DocumentStore>>> {
    let store: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::Disabled => return Ok(None),
        StoreBackend::Memory => Arc::new(InMemoryStore::new()),
        StoreBackend::Sqlite => open_sqlite(&config.sqlite_path).await?,
    };
    tracing::info!(backend = %config.store_backend, "Store opened");
    Ok(Some(store))
}

#[cfg(feature = "redis")]
async fn open_redis(url: &str) -> anyhow::Result<Arc<dyn Cache>> {
    Ok(Arc::new(crate::cache::RedisCache::new(url).await?))
}

#[cfg(not(feature = "redis"))]
async fn open_redis(_url: &str) -> anyhow::Result<Arc<dyn Cache>> {
    anyhow::bail!("Redis cache requested but stowage was built without the `redis` feature")
}

#[cfg(feature = "sqlite")]
async fn open_sqlite(path: &str) -> anyhow::Result<Arc<dyn DocumentStore>> {
    Ok(Arc::new(crate::storage::SqliteStore::new(path).await?))
}

#[cfg(not(feature = "sqlite"))]
async fn open_sqlite(_path: &str) -> anyhow::Result<Arc<dyn DocumentStore>> {
    anyhow::bail!("SQLite store requested but stowage was built without the `sqlite` feature")
}
