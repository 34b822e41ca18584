use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Key-addressed cache store.
///
/// Values are opaque bytes; every write is last-write-wins and no operation
/// is transactional.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key. A missing or expired key is `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores a value with no expiry.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Stores a value that the cache evicts once `ttl` has elapsed.
    async fn volatile_set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Re-arms the expiry of an existing key without rewriting its value.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<()>;

    /// Strips any expiry from an existing key.
    async fn persist(&self, key: &str) -> Result<()>;

    /// Deletes a value from the cache by key.
    async fn delete(&self, key: &str) -> Result<()>;
}
