use std::env;
use std::fmt;
use std::str::FromStr;

use stowage_core::cache::Ttl;

/// Which cache backend to run in front of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackend {
    #[default]
    Memory,
    Redis,
    Disabled,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheBackend::Memory),
            "redis" => Ok(CacheBackend::Redis),
            "none" => Ok(CacheBackend::Disabled),
            other => Err(format!("unknown cache backend '{other}'")),
        }
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheBackend::Memory => f.write_str("memory"),
            CacheBackend::Redis => f.write_str("redis"),
            CacheBackend::Disabled => f.write_str("none"),
        }
    }
}

/// Which persistent store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
    Disabled,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "memory" => Ok(StoreBackend::Memory),
            "none" => Ok(StoreBackend::Disabled),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Sqlite => f.write_str("sqlite"),
            StoreBackend::Memory => f.write_str("memory"),
            StoreBackend::Disabled => f.write_str("none"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Collection default TTL (default: 300 seconds)
    pub cache_ttl: Ttl,
    /// Maximum number of in-memory cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Cache backend (default: memory)
    pub cache_backend: CacheBackend,
    /// Store backend (default: sqlite)
    pub store_backend: StoreBackend,
    /// Path to SQLite database file (default: "stowage.db")
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    pub redis_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STOWAGE_CACHE_TTL_SECONDS` - Cache TTL in seconds, or `never` (default: 300)
    /// - `STOWAGE_CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `STOWAGE_CACHE` - `memory`, `redis` or `none` (default: memory)
    /// - `STOWAGE_STORE` - `sqlite`, `memory` or `none` (default: sqlite)
    /// - `STOWAGE_SQLITE_PATH` - SQLite database path (default: "stowage.db")
    /// - `STOWAGE_REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    ///
    /// Values that fail to parse fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            cache_ttl: lookup("STOWAGE_CACHE_TTL_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            cache_max_entries: lookup("STOWAGE_CACHE_MAX_ENTRIES")
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(10_000),
            cache_backend: lookup("STOWAGE_CACHE")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            store_backend: lookup("STOWAGE_STORE")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            sqlite_path: lookup("STOWAGE_SQLITE_PATH").unwrap_or_else(|| "stowage.db".to_string()),
            redis_url: lookup("STOWAGE_REDIS_URL")
                .unwrap_or_else(|| "redis://localhost:6379".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
