//! Infrastructure layer for external integrations.
//!
//! Implements the storage contract defined by the domain layer.
//!
//! # Modules
//!
//! - [`store`] - Mapping store backends (Redis and in-memory)

pub mod store;
