//! Events emitted by the lifecycle service for analytics and live updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to a short code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Shorten,
    Click,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shorten => f.write_str("shorten"),
            Self::Click => f.write_str("click"),
        }
    }
}

/// Fire-and-forget analytics record.
///
/// Sent over a bounded channel to [`crate::domain::analytics_worker`]; a full
/// or closed channel drops the event without affecting the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub short_code: String,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
}

impl AnalyticsEvent {
    pub fn shorten(short_code: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            short_code: short_code.into(),
            timestamp,
            kind: EventKind::Shorten,
        }
    }

    pub fn click(short_code: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            short_code: short_code.into(),
            timestamp,
            kind: EventKind::Click,
        }
    }
}

/// Live click-count update broadcast to real-time subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickUpdate {
    pub short_code: String,
    pub click_count: u64,
}
