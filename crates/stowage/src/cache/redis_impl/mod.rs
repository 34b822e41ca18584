//! Redis cache backend implementation.
//!
//! Provides a distributed cache using Redis for multi-instance deployments,
//! with connection pooling via the connection manager.

mod cache;
mod error;

pub use cache::RedisCache;
