//! Fixed-interval retry for transient failures.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;
use tracing::{debug, warn};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Re-runs an operation while it fails with a transient error.
///
/// Only [`AppError::is_transient`] errors trigger another attempt; validation
/// failures and conflicts are returned at once.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> RetryConfig {
        self.config
    }

    pub async fn run<T, F, Fut>(&self, operation: &str, mut action: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let retries = self.config.max_attempts.saturating_sub(1) as usize;
        let strategy = FixedInterval::new(self.config.backoff).take(retries);
        let attempts = AtomicU32::new(0);

        let result = RetryIf::start(
            strategy,
            || {
                attempts.fetch_add(1, Ordering::Relaxed);
                action()
            },
            |e: &AppError| {
                let transient = e.is_transient();
                if transient {
                    warn!(
                        "Operation '{}' failed (attempt {}/{}): {}",
                        operation,
                        attempts.load(Ordering::Relaxed),
                        self.config.max_attempts,
                        e
                    );
                }
                transient
            },
        )
        .await;

        let attempts = attempts.load(Ordering::Relaxed);
        if result.is_ok() && attempts > 1 {
            debug!(
                "Operation '{}' succeeded after {} retries",
                operation,
                attempts - 1
            );
        }

        result
    }
}
