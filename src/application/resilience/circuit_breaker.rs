//! Count-based circuit breaker.

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::json;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl fmt::Display for BreakerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakerState::Closed => write!(f, "closed"),
            BreakerState::Open => write!(f, "open"),
            BreakerState::HalfOpen => write!(f, "half_open"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Failure percentage (0-100) at or above which the breaker opens.
    pub failure_rate_threshold: u8,
    /// Number of most recent outcomes considered while closed.
    pub sliding_window_size: usize,
    /// Outcomes required before the failure rate is evaluated.
    pub minimum_calls: usize,
    /// How long the breaker stays open before probing.
    pub open_duration: Duration,
    /// Trial calls permitted while half-open.
    pub half_open_calls: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_rate_threshold: 50,
            sliding_window_size: 2,
            minimum_calls: 1,
            open_duration: Duration::from_millis(1000),
            half_open_calls: 3,
        }
    }
}

#[derive(Debug)]
struct BreakerInner {
    state: BreakerState,
    /// `true` marks a failure.
    outcomes: VecDeque<bool>,
    opened_at: Option<Instant>,
    half_open_issued: u32,
    /// Bumped on every transition so late outcomes from an older state are dropped.
    generation: u64,
}

impl BreakerInner {
    fn transition(&mut self, to: BreakerState, name: &str) {
        if self.state == to {
            return;
        }
        match to {
            BreakerState::Open => warn!(breaker = name, from = %self.state, "Circuit opened"),
            _ => info!(breaker = name, from = %self.state, to = %to, "Circuit state changed"),
        }
        self.state = to;
        self.outcomes.clear();
        self.half_open_issued = 0;
        self.generation += 1;
        self.opened_at = (to == BreakerState::Open).then(Instant::now);
    }

    fn failure_rate_reached(&self, threshold: u8) -> bool {
        let failures = self.outcomes.iter().filter(|failed| **failed).count();
        failures * 100 >= usize::from(threshold) * self.outcomes.len()
    }
}

/// Rejects calls while a dependency keeps failing.
///
/// Closed: outcomes are kept in a window of `sliding_window_size`; once at
/// least `minimum_calls` are recorded and the failure rate reaches the
/// threshold, the breaker opens. Open: calls fail fast with
/// [`AppError::Unavailable`] until `open_duration` passes. Half-open: up to
/// `half_open_calls` trial calls run; their failure rate decides between
/// closing and reopening.
///
/// Only transient errors count as failures.
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(BreakerInner {
                state: BreakerState::Closed,
                outcomes: VecDeque::with_capacity(config.sliding_window_size),
                opened_at: None,
                half_open_issued: 0,
                generation: 0,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> BreakerState {
        let mut inner = self.lock();
        self.refresh(&mut inner);
        inner.state
    }

    /// Runs `call` if the breaker admits it and records the outcome.
    pub async fn call<T, Fut>(&self, call: Fut) -> Result<T, AppError>
    where
        Fut: Future<Output = Result<T, AppError>>,
    {
        let mut permit = self.acquire()?;
        let result = call.await;
        permit.record(result.as_ref().err().is_some_and(AppError::is_transient));
        result
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BreakerInner> {
        // A poisoned lock only means a panic mid-update; the counters are still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn refresh(&self, inner: &mut BreakerInner) {
        if inner.state == BreakerState::Open
            && inner
                .opened_at
                .is_some_and(|at| at.elapsed() >= self.config.open_duration)
        {
            inner.transition(BreakerState::HalfOpen, &self.name);
        }
    }

    fn acquire(&self) -> Result<CallPermit<'_>, AppError> {
        let mut inner = self.lock();
        self.refresh(&mut inner);

        match inner.state {
            BreakerState::Closed => {}
            BreakerState::Open => return Err(self.rejected(inner.state)),
            BreakerState::HalfOpen => {
                if inner.half_open_issued >= self.config.half_open_calls {
                    return Err(self.rejected(inner.state));
                }
                inner.half_open_issued += 1;
            }
        }

        Ok(CallPermit {
            breaker: self,
            generation: inner.generation,
            recorded: false,
        })
    }

    fn rejected(&self, state: BreakerState) -> AppError {
        AppError::unavailable(
            "Service temporarily unavailable",
            json!({ "breaker": self.name, "state": state.to_string() }),
        )
    }

    fn on_outcome(&self, generation: u64, failed: bool) {
        let mut inner = self.lock();
        if inner.generation != generation {
            return;
        }

        match inner.state {
            BreakerState::Closed => {
                inner.outcomes.push_back(failed);
                while inner.outcomes.len() > self.config.sliding_window_size {
                    inner.outcomes.pop_front();
                }
                if inner.outcomes.len() >= self.config.minimum_calls
                    && inner.failure_rate_reached(self.config.failure_rate_threshold)
                {
                    inner.transition(BreakerState::Open, &self.name);
                }
            }
            BreakerState::HalfOpen => {
                inner.outcomes.push_back(failed);
                if inner.outcomes.len() as u32 >= self.config.half_open_calls {
                    if inner.failure_rate_reached(self.config.failure_rate_threshold) {
                        inner.transition(BreakerState::Open, &self.name);
                    } else {
                        inner.transition(BreakerState::Closed, &self.name);
                    }
                }
            }
            BreakerState::Open => {}
        }
    }

    fn on_abandoned(&self, generation: u64) {
        let mut inner = self.lock();
        if inner.generation == generation && inner.state == BreakerState::HalfOpen {
            inner.half_open_issued = inner.half_open_issued.saturating_sub(1);
        }
    }
}

/// Admission for one call; returns a half-open slot if dropped unrecorded.
struct CallPermit<'a> {
    breaker: &'a CircuitBreaker,
    generation: u64,
    recorded: bool,
}

impl CallPermit<'_> {
    fn record(&mut self, failed: bool) {
        self.recorded = true;
        self.breaker.on_outcome(self.generation, failed);
    }
}

impl Drop for CallPermit<'_> {
    fn drop(&mut self) {
        if !self.recorded {
            self.breaker.on_abandoned(self.generation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn breaker() -> CircuitBreaker {
        CircuitBreaker::new("test", CircuitBreakerConfig::default())
    }

    async fn fail(breaker: &CircuitBreaker) -> Result<(), AppError> {
        breaker
            .call(async { Err(AppError::internal("down", json!({}))) })
            .await
    }

    async fn succeed(breaker: &CircuitBreaker) -> Result<(), AppError> {
        breaker.call(async { Ok(()) }).await
    }

    #[tokio::test(start_paused = true)]
    async fn test_opens_after_failure() {
        let breaker = breaker();

        assert!(matches!(fail(&breaker).await, Err(AppError::Internal { .. })));
        assert_eq!(breaker.state(), BreakerState::Open);

        // Open breaker fails fast without running the call
        let ran = AtomicBool::new(false);
        let result: Result<(), AppError> = breaker
            .call(async {
                ran.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(AppError::Unavailable { .. })));
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_transient_errors_do_not_open() {
        let breaker = breaker();

        for _ in 0..5 {
            let result: Result<(), AppError> = breaker
                .call(async { Err(AppError::duplicate_code("abc")) })
                .await;
            assert!(matches!(result, Err(AppError::Conflict { .. })));
        }

        assert_eq!(breaker.state(), BreakerState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_rate_over_window() {
        let breaker = CircuitBreaker::new(
            "test",
            CircuitBreakerConfig {
                failure_rate_threshold: 50,
                sliding_window_size: 4,
                minimum_calls: 4,
                ..CircuitBreakerConfig::default()
            },
        );

        succeed(&breaker).await.unwrap();
        succeed(&breaker).await.unwrap();
        let _ = fail(&breaker).await;
        assert_eq!(breaker.state(), BreakerState::Closed);

        let _ = fail(&breaker).await;
        assert_eq!(breaker.state(), BreakerState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_open_closes_after_successful_trials() {
        let breaker = breaker();
        let _ = fail(&breaker).await;

        tokio::time::advance(Duration::from_millis(1000)).await;
        assert_eq!(breaker.state(), BreakerState::HalfOpen);

        for _ in 0..3 {
            succeed(&breaker).await.unwrap();
        }
        assert_eq!(breaker.state(), BreakerState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_open_reopens_on_failures() {
        let breaker = breaker();
        let _ = fail(&breaker).await;

        tokio::time::advance(Duration::from_millis(1000)).await;

        let _ = fail(&breaker).await;
        let _ = fail(&breaker).await;
        succeed(&breaker).await.unwrap();

        assert_eq!(breaker.state(), BreakerState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_open_limits_trial_calls() {
        let breaker = breaker();
        let _ = fail(&breaker).await;
        tokio::time::advance(Duration::from_millis(1000)).await;

        let permits: Vec<_> = (0..3).map(|_| breaker.acquire().unwrap()).collect();
        assert!(matches!(breaker.acquire(), Err(AppError::Unavailable { .. })));

        // Abandoned trials hand their slot back
        drop(permits);
        assert!(breaker.acquire().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stays_open_before_duration() {
        let breaker = breaker();
        let _ = fail(&breaker).await;

        tokio::time::advance(Duration::from_millis(999)).await;
        assert_eq!(breaker.state(), BreakerState::Open);
    }
}
