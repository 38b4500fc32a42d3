//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating store calls,
//! validation, and business rules. Services consume the store trait and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlLifecycleService`] - Short link creation, resolution and click counts
//! - [`services::admission_controller::AdmissionController`] - Per-client fixed-window admission
//! - [`services::event_publisher::EventPublisher`] - Analytics queue and live click updates
//! - [`resilience::ResilientUrlService`] - Retry, circuit breaker and bulkhead around the lifecycle service

pub mod resilience;
pub mod services;
