//! Mapping store backends.
//!
//! Provides two [`crate::domain::repositories::MappingStore`] implementations:
//! - [`RedisMappingStore`] - Production Redis-backed store
//! - [`InMemoryMappingStore`] - Process-local store for development and tests

mod memory_store;
mod redis_store;

pub use memory_store::InMemoryMappingStore;
pub use redis_store::RedisMappingStore;
