//! Per-client fixed-window admission control for the write path.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tracing::debug;

use crate::utils::clock::{Clock, SystemClock};

/// Limits for [`AdmissionController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionConfig {
    /// Requests allowed per window and key.
    pub max_requests: u32,
    /// Window length in whole seconds.
    pub window_seconds: i64,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_seconds: 60,
        }
    }
}

/// Request counter for one client key.
#[derive(Debug, Clone, Copy)]
struct RequestWindow {
    count: u32,
    window_start: DateTime<Utc>,
}

impl RequestWindow {
    fn open(now: DateTime<Utc>) -> Self {
        Self {
            count: 1,
            window_start: now,
        }
    }
}

/// Fixed-window request counter keyed by client identity.
///
/// Windows are created on a key's first request and replaced wholesale once
/// more than `window_seconds` whole seconds have passed since they opened.
/// A request at exactly `window_seconds` still counts against the old window.
///
/// Keys live in a sharded map: the check-then-update for one key runs under
/// that key's shard lock, and unrelated keys never wait on each other.
pub struct AdmissionController {
    windows: DashMap<String, RequestWindow>,
    config: AdmissionConfig,
    clock: Arc<dyn Clock>,
}

impl AdmissionController {
    pub fn new(config: AdmissionConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: AdmissionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: DashMap::new(),
            config,
            clock,
        }
    }

    pub fn config(&self) -> AdmissionConfig {
        self.config
    }

    /// Decides whether one more request from `key` may proceed.
    ///
    /// A denial leaves the window untouched.
    pub fn is_allowed(&self, key: &str) -> bool {
        let now = self.clock.now();

        match self.windows.entry(key.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(RequestWindow::open(now));
                true
            }
            Entry::Occupied(mut slot) => {
                let window = slot.get_mut();
                let elapsed = (now - window.window_start).num_seconds();

                if elapsed > self.config.window_seconds {
                    *window = RequestWindow::open(now);
                    return true;
                }

                if window.count >= self.config.max_requests {
                    debug!(key, count = window.count, "Admission denied");
                    return false;
                }

                window.count += 1;
                true
            }
        }
    }

    /// Number of client keys with a window on record.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}
