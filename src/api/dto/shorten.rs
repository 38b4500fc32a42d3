//! DTOs for link shortening endpoints.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::{MAX_TTL_SECONDS, NewMapping};

/// Compiled regex for custom code validation.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]*$").unwrap());

/// Request to shorten a single URL.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// The original URL to shorten (absolute HTTP/HTTPS, checked by the service).
    #[validate(length(min = 1, message = "originalUrl must not be empty"))]
    pub original_url: String,

    /// Optional custom short code. An empty string means "generate one".
    #[validate(length(max = 64))]
    #[validate(regex(
        path = "*CUSTOM_CODE_REGEX",
        message = "customShortCode may only contain letters, digits, '_' and '-'"
    ))]
    pub custom_short_code: Option<String>,

    /// Lifetime in seconds. Zero, negative or absent means the link never expires.
    #[validate(range(max = MAX_TTL_SECONDS, message = "ttlSeconds is too large"))]
    pub ttl_seconds: Option<i64>,
}

impl From<ShortenRequest> for NewMapping {
    fn from(req: ShortenRequest) -> Self {
        NewMapping {
            original_url: req.original_url,
            custom_code: req.custom_short_code,
            ttl_seconds: req.ttl_seconds,
        }
    }
}

/// A created short link.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
    pub original_url: String,
    pub short_code: String,
}

/// Several shorten requests processed in order.
#[derive(Debug, Deserialize, Validate)]
pub struct BulkShortenRequest {
    #[validate(nested)]
    pub requests: Vec<ShortenRequest>,
}

/// Results in the same order as the request.
#[derive(Debug, Serialize, Deserialize)]
pub struct BulkShortenResponse {
    pub responses: Vec<ShortenResponse>,
}
