//! Domain layer: entities, storage contract and event types.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Storage trait definitions
//! - [`analytics_event`] - Analytics and live-update event models
//! - [`analytics_worker`] - Background analytics consumer
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers; orchestration lives in [`crate::application::services`].
//!
//! # Event Flow
//!
//! 1. [`crate::application::services::UrlLifecycleService`] completes a shorten or resolve
//! 2. An [`analytics_event::AnalyticsEvent`] is pushed into a bounded channel (never blocking)
//! 3. [`analytics_worker::run_analytics_worker`] drains the channel
//! 4. Resolves additionally broadcast an [`analytics_event::ClickUpdate`]

pub mod analytics_event;
pub mod analytics_worker;
pub mod entities;
pub mod repositories;
