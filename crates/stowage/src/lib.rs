//! Cache-aside entity repository.
//!
//! [`Repository`] coordinates a persistent [`DocumentStore`] and a TTL
//! [`Cache`] for one collection of entities. This crate also ships the
//! backends:
//!
//! - caches: [`cache::MemoryCache`] and, with the `redis` feature,
//!   `cache::RedisCache`,
//! - stores: [`storage::InMemoryStore`] and, with the `sqlite` feature,
//!   `storage::SqliteStore`.
//!
//! [`DocumentStore`]: stowage_core::storage::DocumentStore
//! [`Cache`]: stowage_core::cache::Cache

pub mod backends;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod repository;
pub mod storage;

pub use config::Config;
pub use repository::{
    BackgroundObserver, BackgroundTask, CacheOptions, Repository, RepositoryBuilder,
    RepositoryError, SearchPage, TracingObserver,
};
