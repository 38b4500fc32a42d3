//! Concurrency cap with bounded waiting.

use std::future::Future;
use std::time::Duration;

use serde_json::json;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::warn;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkheadConfig {
    pub max_concurrent: usize,
    /// Longest a call may wait for a free slot.
    pub max_wait: Duration,
}

impl Default for BulkheadConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 10,
            max_wait: Duration::from_millis(100),
        }
    }
}

/// Semaphore-backed limit on calls in flight.
///
/// A call that cannot get a slot within `max_wait` is rejected with
/// [`AppError::Unavailable`] and never runs.
pub struct Bulkhead {
    semaphore: Semaphore,
    config: BulkheadConfig,
}

impl Bulkhead {
    pub fn new(config: BulkheadConfig) -> Self {
        Self {
            semaphore: Semaphore::new(config.max_concurrent),
            config,
        }
    }

    /// Free slots right now.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub async fn call<T, Fut>(&self, call: Fut) -> Result<T, AppError>
    where
        Fut: Future<Output = Result<T, AppError>>,
    {
        let _permit = match timeout(self.config.max_wait, self.semaphore.acquire()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_closed)) => {
                return Err(AppError::unavailable("Bulkhead closed", json!({})));
            }
            Err(_elapsed) => {
                warn!(
                    max_concurrent = self.config.max_concurrent,
                    "Bulkhead full, rejecting call"
                );
                return Err(AppError::unavailable(
                    "Too many concurrent requests",
                    json!({ "maxConcurrent": self.config.max_concurrent }),
                ));
            }
        };

        call.await
    }
}
