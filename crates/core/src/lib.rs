//! Core types and collaborator traits for the stowage entity repository.
//!
//! This crate holds the pure parts of the repository: the [`entity::Entity`]
//! contract, raw record shapes, the hydrator, the serializer projections and
//! the traits implemented by the cache and persistent-store backends. It
//! performs no I/O of its own.

pub mod cache;
pub mod entity;
pub mod hydrate;
pub mod record;
pub mod serialization;
pub mod storage;
