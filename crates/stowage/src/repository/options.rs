use stowage_core::cache::{cache_key, Ttl};

/// Per-operation overrides for cache addressing and expiry.
///
/// Unset fields fall back to the collection binding: the key to
/// `collection/id`, the TTL to the collection default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheOptions {
    pub key: Option<String>,
    pub ttl: Option<Ttl>,
}

impl CacheOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the cache key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Overrides the TTL.
    pub fn ttl(mut self, ttl: Ttl) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub(crate) fn resolve_key(&self, collection: &str, id: &str) -> String {
        match &self.key {
            Some(key) => key.clone(),
            None => cache_key(collection, id),
        }
    }

    pub(crate) fn resolve_ttl(&self, default: Ttl) -> Ttl {
        Ttl::resolve(default, self.ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_collection() {
        let options = CacheOptions::new();

        assert_eq!(options.resolve_key("users", "u1"), "users/u1");
        assert_eq!(options.resolve_ttl(Ttl::secs(300)), Ttl::secs(300));
    }

    #[test]
    fn test_overrides_win() {
        let options = CacheOptions::new().key("custom").ttl(Ttl::Never);

        assert_eq!(options.resolve_key("users", "u1"), "custom");
        assert_eq!(options.resolve_ttl(Ttl::secs(300)), Ttl::Never);
    }
}
