//! Cache-aside entity repository.
//!
//! A [`Repository`] binds one entity type to one collection and coordinates
//! two optional collaborators:
//!
//! - a durable [`DocumentStore`], the source of truth,
//! - a volatile, TTL-governed [`Cache`] in front of it.
//!
//! Reads go cache first and fall back to the store, writing the record back
//! into the cache on the way out. Writes are explicit: persisting to the store
//! and persisting to the cache are separate calls.
//!
//! Either collaborator may be absent. Operations that need a missing one
//! degrade to `None` or a no-op instead of failing.

mod background;
mod error;
mod loader;
mod options;
mod persister;

#[cfg(test)]
mod testing;

pub use background::{BackgroundObserver, BackgroundTask, TracingObserver};
pub use error::{RepositoryError, Result};
pub use loader::SearchPage;
pub use options::CacheOptions;

use std::sync::Arc;

use stowage_core::cache::{Cache, Ttl};
use stowage_core::entity::Entity;
use stowage_core::serialization::{IdentitySerializer, RecordSerializer};
use stowage_core::storage::DocumentStore;

type Constructor<E> = Arc<dyn Fn() -> E + Send + Sync>;

/// Everything a repository knows about its collection. Immutable once built.
struct Binding<E: Entity> {
    collection: String,
    ttl: Ttl,
    cache: Option<Arc<dyn Cache>>,
    store: Option<Arc<dyn DocumentStore>>,
    serializer: Arc<dyn RecordSerializer<E>>,
    constructor: Constructor<E>,
    observer: Arc<dyn BackgroundObserver>,
}

/// Loads and persists entities of one collection.
///
/// Cheap to clone: clones share the same binding.
pub struct Repository<E: Entity> {
    binding: Arc<Binding<E>>,
}

impl<E: Entity> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            binding: Arc::clone(&self.binding),
        }
    }
}

impl<E: Entity + Default> Repository<E> {
    /// Starts a builder for `collection`; fresh entities come from `E::default`.
    pub fn builder(collection: impl Into<String>) -> RepositoryBuilder<E> {
        RepositoryBuilder::new(collection, Arc::new(E::default))
    }
}

impl<E: Entity> Repository<E> {
    /// Starts a builder for an entity type constructed by `constructor`.
    pub fn builder_with<F>(collection: impl Into<String>, constructor: F) -> RepositoryBuilder<E>
    where
        F: Fn() -> E + Send + Sync + 'static,
    {
        RepositoryBuilder::new(collection, Arc::new(constructor))
    }

    /// Name of the bound collection.
    pub fn collection(&self) -> &str {
        &self.binding.collection
    }

    /// TTL applied when an operation does not override it.
    pub fn default_ttl(&self) -> Ttl {
        self.binding.ttl
    }

    /// Whether a cache is configured.
    pub fn has_cache(&self) -> bool {
        self.binding.cache.is_some()
    }

    /// Whether a persistent store is configured.
    pub fn has_store(&self) -> bool {
        self.binding.store.is_some()
    }

    fn fresh(&self) -> E {
        (self.binding.constructor)()
    }
}

impl<E: Entity> std::fmt::Debug for Repository<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("entity", &E::KIND)
            .field("collection", &self.binding.collection)
            .field("ttl", &self.binding.ttl)
            .field("cache", &self.has_cache())
            .field("store", &self.has_store())
            .finish()
    }
}

/// Builder for [`Repository`].
///
/// Both collaborators start disabled, the TTL at [`Ttl::default`], the
/// serializer at [`IdentitySerializer`] and the observer at
/// [`TracingObserver`].
pub struct RepositoryBuilder<E: Entity> {
    collection: String,
    ttl: Ttl,
    cache: Option<Arc<dyn Cache>>,
    store: Option<Arc<dyn DocumentStore>>,
    serializer: Arc<dyn RecordSerializer<E>>,
    constructor: Constructor<E>,
    observer: Arc<dyn BackgroundObserver>,
}

impl<E: Entity> RepositoryBuilder<E> {
    fn new(collection: impl Into<String>, constructor: Constructor<E>) -> Self {
        Self {
            collection: collection.into(),
            ttl: Ttl::default(),
            cache: None,
            store: None,
            serializer: Arc::new(IdentitySerializer),
            constructor,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Sets the collection default TTL.
    pub fn ttl(mut self, ttl: Ttl) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets or clears the cache; `None` disables every cache path.
    pub fn maybe_cache(mut self, cache: Option<Arc<dyn Cache>>) -> Self {
        self.cache = cache;
        self
    }

    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets or clears the persistent store.
    pub fn maybe_store(mut self, store: Option<Arc<dyn DocumentStore>>) -> Self {
        self.store = store;
        self
    }

    pub fn serializer(mut self, serializer: Arc<dyn RecordSerializer<E>>) -> Self {
        self.serializer = serializer;
        self
    }

    /// Replaces the function producing blank entities for hydration.
    pub fn constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> E + Send + Sync + 'static,
    {
        self.constructor = Arc::new(constructor);
        self
    }

    /// Sets the sink for background cache failures.
    pub fn observer(mut self, observer: Arc<dyn BackgroundObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn build(self) -> Repository<E> {
        tracing::debug!(
            entity = E::KIND,
            collection = %self.collection,
            ttl = %self.ttl,
            cache = self.cache.is_some(),
            store = self.store.is_some(),
            "Repository created"
        );
        Repository {
            binding: Arc::new(Binding {
                collection: self.collection,
                ttl: self.ttl,
                cache: self.cache,
                store: self.store,
                serializer: self.serializer,
                constructor: self.constructor,
                observer: self.observer,
            }),
        }
    }
}
