//! # Shortscale
//!
//! A compact URL shortening service built with Axum and Redis.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Mapping entity, store trait, analytics events
//! - **Application Layer** ([`application`]) - Lifecycle service, admission control, resilience policies
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis and in-memory mapping stores
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Counter-based base-62 short codes, or caller-chosen custom codes
//! - Optional per-link TTL with lazy expiry
//! - Exact click counting under concurrent redirects
//! - Per-client fixed-window admission on the write path
//! - Retry, circuit breaker and bulkhead around store access
//! - Analytics events, live click updates and metrics counters
//!
//! ## Quick Start
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379"  # Optional, in-memory otherwise
//! export BASE_URL="https://sho.rt"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::resilience::ResilientUrlService;
    pub use crate::application::services::{
        AdmissionController, EventPublisher, UrlLifecycleService,
    };
    pub use crate::domain::entities::{NewMapping, ShortenedUrl, UrlMapping};
    pub use crate::domain::repositories::MappingStore;
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
