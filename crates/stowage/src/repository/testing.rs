//! Mock collaborators shared by the repository tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use stowage_core::cache::{Cache, CacheError, Result as CacheResult};
use stowage_core::record::{Record, StoreResponse};
use stowage_core::storage::{
    DocumentStore, MultiGetItem, PersistResult, Result as StoreResult, SearchQuery, SearchResult,
    StoreError,
};

use super::background::{BackgroundObserver, BackgroundTask};
use super::error::RepositoryError;
use crate::storage::InMemoryStore;

/// Polls `check` until it holds or one second has passed.
pub async fn eventually(check: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

pub fn record(value: Value) -> Record {
    match value {
        Value::Object(record) => record,
        _ => unreachable!("test records are objects"),
    }
}

/// A cache operation as seen by [`MockCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheCall {
    Get(String),
    Set(String),
    VolatileSet(String, Duration),
    Expire(String, Duration),
    Persist(String),
    Delete(String),
}

/// Cache that records every call. Reads or writes can be made to fail.
#[derive(Default)]
pub struct MockCache {
    entries: Mutex<HashMap<String, (Vec<u8>, Option<Duration>)>>,
    calls: Mutex<Vec<CacheCall>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache whose reads work but every write fails.
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// A cache whose every `get` fails.
    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, key: &str, value: Value) {
        let bytes = serde_json::to_vec(&value).unwrap();
        self.insert_bytes(key, &bytes);
    }

    pub fn insert_bytes(&self, key: &str, bytes: &[u8]) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (bytes.to_vec(), None));
    }

    /// The stored value, decoded as JSON.
    pub fn value(&self, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .map(|(bytes, _)| serde_json::from_slice(bytes).unwrap())
    }

    /// The expiry of a stored key; `Some(None)` when it never expires.
    pub fn ttl(&self, key: &str) -> Option<Option<Duration>> {
        self.entries.lock().unwrap().get(key).map(|(_, ttl)| *ttl)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<CacheCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record_call(&self, call: CacheCall) -> CacheResult<()> {
        let is_read = matches!(call, CacheCall::Get(_));
        self.calls.lock().unwrap().push(call);
        if (is_read && self.fail_reads) || (!is_read && self.fail_writes) {
            return Err(CacheError::ConnectionFailed("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Cache for MockCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        self.record_call(CacheCall::Get(key.to_string()))?;
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(key)
            .map(|(bytes, _)| bytes.clone()))
    }

    async fn set(&self, key: &str, value: &[u8]) -> CacheResult<()> {
        self.record_call(CacheCall::Set(key.to_string()))?;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_vec(), None));
        Ok(())
    }

    async fn volatile_set(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        self.record_call(CacheCall::VolatileSet(key.to_string(), ttl))?;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_vec(), Some(ttl)));
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<()> {
        self.record_call(CacheCall::Expire(key.to_string(), ttl))?;
        if let Some(entry) = self.entries.lock().unwrap().get_mut(key) {
            entry.1 = Some(ttl);
        }
        Ok(())
    }

    async fn persist(&self, key: &str) -> CacheResult<()> {
        self.record_call(CacheCall::Persist(key.to_string()))?;
        if let Some(entry) = self.entries.lock().unwrap().get_mut(key) {
            entry.1 = None;
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.record_call(CacheCall::Delete(key.to_string()))?;
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// In-memory store that counts calls and can be switched to fail every call.
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryStore,
    failure: Option<StoreError>,
    pub get_calls: AtomicUsize,
    pub mget_calls: AtomicUsize,
    pub upsert_calls: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: StoreError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub async fn insert(&self, collection: &str, value: Value) {
        self.inner.upsert(collection, record(value)).await.unwrap();
    }

    pub async fn fetch(&self, collection: &str, id: &str) -> StoreResult<StoreResponse> {
        self.inner.get(collection, id).await
    }

    pub fn gets(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> StoreResult<()> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<StoreResponse> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.get(collection, id).await
    }

    async fn mget(&self, collection: &str, ids: &[String]) -> StoreResult<Vec<MultiGetItem>> {
        self.mget_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.mget(collection, ids).await
    }

    async fn upsert(&self, collection: &str, record: Record) -> StoreResult<PersistResult> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.upsert(collection, record).await
    }

    async fn search(&self, collection: &str, query: &SearchQuery) -> StoreResult<SearchResult> {
        self.check()?;
        self.inner.search(collection, query).await
    }
}

/// Observer that keeps every reported failure.
#[derive(Default)]
pub struct RecordingObserver {
    failures: Mutex<Vec<(BackgroundTask, String, RepositoryError)>>,
}

impl RecordingObserver {
    pub fn failures(&self) -> Vec<(BackgroundTask, String, RepositoryError)> {
        self.failures.lock().unwrap().clone()
    }
}

impl BackgroundObserver for RecordingObserver {
    fn on_failure(&self, task: BackgroundTask, key: &str, error: &RepositoryError) {
        self.failures
            .lock()
            .unwrap()
            .push((task, key.to_string(), error.clone()));
    }
}
