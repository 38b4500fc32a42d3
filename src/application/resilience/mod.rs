//! Fault-tolerance policies wrapped around the lifecycle service.
//!
//! # Modules
//!
//! - [`retry`] - Fixed-interval retry for transient errors
//! - [`circuit_breaker`] - Count-based breaker that fails fast while a dependency is down
//! - [`bulkhead`] - Cap on concurrent calls with a bounded wait

pub mod bulkhead;
pub mod circuit_breaker;
pub mod retry;

use std::future::Future;
use std::sync::Arc;

pub use bulkhead::{Bulkhead, BulkheadConfig};
pub use circuit_breaker::{BreakerState, CircuitBreaker, CircuitBreakerConfig};
pub use retry::{RetryConfig, RetryPolicy};

use crate::application::services::UrlLifecycleService;
use crate::domain::entities::{NewMapping, ShortenedUrl};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResilienceConfig {
    pub retry: RetryConfig,
    pub breaker: CircuitBreakerConfig,
    pub bulkhead: BulkheadConfig,
}

/// Bulkhead, then circuit breaker, then retry.
///
/// The breaker sees one outcome per retried call, so a call that succeeds on
/// its second attempt counts as a success.
pub struct ResiliencePipeline {
    retry: RetryPolicy,
    breaker: CircuitBreaker,
    bulkhead: Bulkhead,
}

impl ResiliencePipeline {
    pub fn new(name: &str, config: ResilienceConfig) -> Self {
        Self {
            retry: RetryPolicy::new(config.retry),
            breaker: CircuitBreaker::new(name, config.breaker),
            bulkhead: Bulkhead::new(config.bulkhead),
        }
    }

    /// Runs `action` under every policy.
    pub async fn execute<T, F, Fut>(&self, operation: &str, action: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        self.bulkhead
            .call(self.breaker.call(self.retry.run(operation, action)))
            .await
    }

    /// Runs `call` under the circuit breaker only.
    pub async fn guard<T, Fut>(&self, call: Fut) -> Result<T, AppError>
    where
        Fut: Future<Output = Result<T, AppError>>,
    {
        self.breaker.call(call).await
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn bulkhead(&self) -> &Bulkhead {
        &self.bulkhead
    }
}

/// [`UrlLifecycleService`] behind a [`ResiliencePipeline`].
///
/// - `shorten`: bulkhead, breaker and retry
/// - `bulk_shorten`: `shorten` per input
/// - `resolve`: breaker only
/// - `click_count`: called directly
pub struct ResilientUrlService {
    inner: Arc<UrlLifecycleService>,
    pipeline: ResiliencePipeline,
}

impl ResilientUrlService {
    pub fn new(inner: Arc<UrlLifecycleService>, config: ResilienceConfig) -> Self {
        Self {
            inner,
            pipeline: ResiliencePipeline::new("url-service", config),
        }
    }

    pub fn inner(&self) -> &Arc<UrlLifecycleService> {
        &self.inner
    }

    pub fn pipeline(&self) -> &ResiliencePipeline {
        &self.pipeline
    }

    pub async fn shorten(&self, input: NewMapping) -> Result<ShortenedUrl, AppError> {
        self.pipeline
            .execute("shorten", || self.inner.shorten(input.clone()))
            .await
    }

    pub async fn resolve(&self, short_code: &str) -> Result<Option<String>, AppError> {
        self.pipeline.guard(self.inner.resolve(short_code)).await
    }

    pub async fn click_count(&self, short_code: &str) -> Result<u64, AppError> {
        self.inner.click_count(short_code).await
    }

    /// Shortens each input in order, each under its own pipeline call.
    ///
    /// A transient failure is retried for that input alone; inputs already
    /// stored are never replayed. The first error that survives the policies
    /// aborts the batch.
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
