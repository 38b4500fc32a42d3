//! Short code to URL mapping, the unit of stored state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Longest accepted lifetime: 100 years of 365 days.
pub const MAX_TTL_SECONDS: i64 = 100 * 365 * 24 * 60 * 60;

/// A stored short code and the URL it points at.
///
/// `short_code`, `original_url` and `created_at` never change after creation.
/// `click_count` only grows, and only through a successful resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlMapping {
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: u64,
}

impl UrlMapping {
    /// Builds a fresh mapping with zero clicks.
    ///
    /// Only a strictly positive `ttl_seconds` sets an expiry; zero, negative
    /// or absent values produce a mapping that never expires.
    pub fn new(
        short_code: impl Into<String>,
        original_url: impl Into<String>,
        created_at: DateTime<Utc>,
        ttl_seconds: Option<i64>,
    ) -> Self {
        let expires_at = ttl_seconds
            .filter(|ttl| *ttl > 0)
            .and_then(Duration::try_seconds)
            .and_then(|ttl| created_at.checked_add_signed(ttl));

        Self {
            short_code: short_code.into(),
            original_url: original_url.into(),
            created_at,
            expires_at,
            click_count: 0,
        }
    }

    /// Returns true once `now` is strictly past the expiry time.
    ///
    /// A mapping read exactly at `expires_at` is still live.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now > e)
    }
}

/// Input for creating a mapping.
#[derive(Debug, Clone, Default)]
pub struct NewMapping {
    pub original_url: String,
    pub custom_code: Option<String>,
    pub ttl_seconds: Option<i64>,
}

impl NewMapping {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            ..Default::default()
        }
    }

    pub fn with_custom_code(mut self, code: impl Into<String>) -> Self {
        self.custom_code = Some(code.into());
        self
    }

    pub fn with_ttl_seconds(mut self, ttl_seconds: i64) -> Self {
        self.ttl_seconds = Some(ttl_seconds);
        self
    }
}

/// Result of a successful shorten: the assigned code and the submitted URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenedUrl {
    pub short_code: String,
    pub original_url: String,
}
