//! Short link lifecycle: creation, resolution and click accounting.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::application::services::event_publisher::EventPublisher;
use crate::domain::analytics_event::{AnalyticsEvent, ClickUpdate};
use crate::domain::entities::{MAX_TTL_SECONDS, NewMapping, ShortenedUrl, UrlMapping};
use crate::domain::repositories::MappingStore;
use crate::error::AppError;
use crate::utils::clock::{Clock, SystemClock};
use crate::utils::code_generator::{CodeGenerator, validate_custom_code};
use crate::utils::target_url::validate_target_url;

/// Metric name for successful shorten operations.
pub const URLS_SHORTENED_TOTAL: &str = "urls_shortened_total";
/// Metric name for successful resolves.
pub const URLS_CLICKED_TOTAL: &str = "urls_clicked_total";

/// Creates mappings, resolves codes and reports click counts.
///
/// Expiry is applied lazily when a code is resolved; nothing is ever deleted.
/// Click increments go through [`MappingStore::increment_click_count`], so
/// concurrent resolves of one code each count exactly once.
pub struct UrlLifecycleService {
    store: Arc<dyn MappingStore>,
    generator: Arc<CodeGenerator>,
    events: EventPublisher,
    clock: Arc<dyn Clock>,
}

impl UrlLifecycleService {
    /// Creates a new lifecycle service reading time from the system clock.
    pub fn new(
        store: Arc<dyn MappingStore>,
        generator: Arc<CodeGenerator>,
        events: EventPublisher,
    ) -> Self {
        Self {
            store,
            generator,
            events,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn events(&self) -> &EventPublisher {
        &self.events
    }

    pub fn store(&self) -> &Arc<dyn MappingStore> {
        &self.store
    }

    /// Stores a new mapping and returns its short code.
    ///
    /// # Code Assignment
    ///
    /// - A non-empty custom code is used verbatim unless it is reserved or a
    ///   record (live or expired) already holds it; the claim is an atomic
    ///   insert, so concurrent requests for one code get a single winner
    /// - Otherwise the next counter code is taken; generated codes are not
    ///   checked against the store
    ///
    /// # Expiry
    ///
    /// `expires_at = now + ttl_seconds` only when `ttl_seconds > 0`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not an absolute HTTP(S) URL,
    /// the custom code is reserved, or the TTL exceeds [`MAX_TTL_SECONDS`].
    /// Returns [`AppError::Conflict`] if the custom code is taken.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn shorten(&self, input: NewMapping) -> Result<ShortenedUrl, AppError> {
        validate_target_url(&input.original_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        if let Some(ttl) = input.ttl_seconds.filter(|ttl| *ttl > MAX_TTL_SECONDS) {
            return Err(AppError::bad_request(
                "TTL is too large",
                json!({ "ttlSeconds": ttl, "max": MAX_TTL_SECONDS }),
            ));
        }

        let custom_code = input.custom_code.filter(|c| !c.is_empty());
        if let Some(custom) = &custom_code {
            validate_custom_code(custom)?;
            if self.store.exists_by_short_code(custom).await? {
                return Err(AppError::duplicate_code(custom));
            }
        }

        let now = self.clock.now();

        let short_code = match custom_code {
            Some(custom) => {
                let mapping = UrlMapping::new(
                    custom.clone(),
                    input.original_url.clone(),
                    now,
                    input.ttl_seconds,
                );
                // A concurrent shorten may have claimed the code since the check above
                if !self.store.insert_if_absent(mapping).await? {
                    return Err(AppError::duplicate_code(&custom));
                }
                custom
            }
            None => {
                let short_code = self.generator.next();
                let mapping = UrlMapping::new(
                    short_code.clone(),
                    input.original_url.clone(),
                    now,
                    input.ttl_seconds,
                );
                self.store.save(mapping).await?;
                short_code
            }
        };

        self.events.emit(AnalyticsEvent::shorten(&short_code, now));
        metrics::counter!(URLS_SHORTENED_TOTAL).increment(1);

        info!("Shortened URL: {} to {}", input.original_url, short_code);

        Ok(ShortenedUrl {
            short_code,
            original_url: input.original_url,
        })
    }

    /// Resolves a code to its URL, counting the click.
    ///
    /// Returns `Ok(None)` for unknown codes and for codes past their expiry;
    /// an expired record is left in place with its count unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn resolve(&self, short_code: &str) -> Result<Option<String>, AppError> {
        let Some(mapping) = self.store.find_by_short_code(short_code).await? else {
            debug!("Resolve miss: {}", short_code);
            return Ok(None);
        };

        let now = self.clock.now();
        if mapping.is_expired_at(now) {
            debug!("Resolve expired: {}", short_code);
            return Ok(None);
        }

        let Some(click_count) = self.store.increment_click_count(short_code).await? else {
            return Ok(None);
        };

        self.events.publish_click(ClickUpdate {
            short_code: short_code.to_string(),
            click_count,
        });
        self.events.emit(AnalyticsEvent::click(short_code, now));
        metrics::counter!(URLS_CLICKED_TOTAL).increment(1);

        Ok(Some(mapping.original_url))
    }

    /// Returns the recorded click count, or 0 for unknown codes.
    ///
    /// Expiry is not applied: an expired mapping still reports the clicks it
    /// collected while live.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn click_count(&self, short_code: &str) -> Result<u64, AppError> {
        Ok(self
            .store
            .find_by_short_code(short_code)
            .await?
            .map_or(0, |m| m.click_count))
    }

    /// Shortens each input in order.
    ///
    /// The first failure is returned immediately and the remaining inputs are
    /// not attempted. Mappings created before the failure stay stored.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by [`Self::shorten`].
    pub async fn bulk_shorten(
        &self,
        inputs: Vec<NewMapping>,
    ) -> Result<Vec<ShortenedUrl>, AppError> {
        let mut results = Vec::with_capacity(inputs.len());

        for input in inputs {
            results.push(self.shorten(input).await?);
        }

        Ok(results)
    }
}
