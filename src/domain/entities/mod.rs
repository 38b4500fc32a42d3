//! Core domain entities.
//!
//! - [`UrlMapping`] - A stored short code and its target URL
//! - [`NewMapping`] - Input for creating a mapping
//! - [`ShortenedUrl`] - What a successful shorten hands back

pub mod url_mapping;

pub use url_mapping::{MAX_TTL_SECONDS, NewMapping, ShortenedUrl, UrlMapping};
