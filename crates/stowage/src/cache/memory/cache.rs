//! In-memory cache implementation with LRU eviction.
//!
//! Provides a thread-safe in-memory cache with TTL support using
//! tokio synchronization primitives and LRU eviction policy. Expiry follows
//! Redis semantics: `expire` and `persist` only touch live keys.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use stowage_core::cache::{Cache, CacheError, Result};

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    /// Creates a new cache entry with optional TTL.
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.and_then(deadline);
        Self { value, expires_at }
    }

    /// Returns true if this entry has expired.
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }
}

/// Instant at which a key written now with `ttl` expires.
///
/// A deadline past what `Instant` can represent means the key never expires.
fn deadline(ttl: Duration) -> Option<Instant> {
    Instant::now().checked_add(ttl)
}

/// In-memory cache implementation with LRU eviction.
///
/// Thread-safe cache using `Arc<RwLock<LruCache>>` for concurrent access.
/// Supports TTL with lazy expiration (entries are dropped on access).
/// Uses LRU eviction to limit memory usage when max_entries is reached.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
}

impl MemoryCache {
    /// Creates a new in-memory cache with LRU eviction.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::OperationFailed` if `max_entries` is 0.
    pub fn new(max_entries: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(max_entries).ok_or_else(|| {
            CacheError::OperationFailed("max_entries must be greater than 0".to_string())
        })?;
        Ok(Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        })
    }

    /// Returns the remaining lifetime of a live key.
    ///
    /// `None` when the key is missing or expired, `Some(None)` when it never
    /// expires.
    pub async fn time_to_live(&self, key: &str) -> Option<Option<Duration>> {
        let store = self.store.read().await;
        match store.peek(key) {
            Some(entry) if !entry.is_expired() => Some(
                entry
                    .expires_at
                    .map(|exp| exp.saturating_duration_since(Instant::now())),
            ),
            _ => None,
        }
    }

    /// Number of entries held, including expired ones not yet dropped.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Returns true when the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    async fn put(&self, key: &str, value: &[u8], ttl: Option<Duration>) {
        let mut store = self.store.write().await;
        store.put(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut store = self.store.write().await;

        let expired = match store.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            store.pop(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.put(key, value, None).await;
        Ok(())
    }

    async fn volatile_set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        self.put(key, value, Some(ttl)).await;
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut store = self.store.write().await;
        if let Some(entry) = store.peek_mut(key) {
            if !entry.is_expired() {
                entry.expires_at = deadline(ttl);
            }
        }
        Ok(())
    }

    async fn persist(&self, key: &str) -> Result<()> {
        let mut store = self.store.write().await;
        if let Some(entry) = store.peek_mut(key) {
            if !entry.is_expired() {
                entry.expires_at = None;
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.pop(key);
        Ok(())
    }
}
