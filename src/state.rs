//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::resilience::ResilientUrlService;
use crate::application::services::{AdmissionController, EventPublisher};
use crate::domain::repositories::MappingStore;

#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<ResilientUrlService>,
    pub admission: Arc<AdmissionController>,
    pub events: EventPublisher,
    pub store: Arc<dyn MappingStore>,
    /// Public prefix for short URLs, without a trailing slash.
    pub base_url: String,
    /// Take client identity from forwarding headers instead of the peer address.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(
        url_service: Arc<ResilientUrlService>,
        admission: Arc<AdmissionController>,
        events: EventPublisher,
        store: Arc<dyn MappingStore>,
        base_url: impl Into<String>,
        behind_proxy: bool,
    ) -> Self {
        Self {
            url_service,
            admission,
            events,
            store,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            behind_proxy,
        }
    }

    /// Full public URL for a short code.
    pub fn short_url(&self, short_code: &str) -> String {
        format!("{}/{}", self.base_url, short_code)
    }
}
