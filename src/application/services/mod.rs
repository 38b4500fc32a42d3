//! Business logic services for the application layer.

pub mod admission_controller;
pub mod event_publisher;
pub mod url_service;

pub use admission_controller::{AdmissionConfig, AdmissionController};
pub use event_publisher::EventPublisher;
pub use url_service::UrlLifecycleService;
