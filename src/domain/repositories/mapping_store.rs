//! Storage contract for URL mappings.

use crate::domain::entities::UrlMapping;
use crate::error::AppError;
use async_trait::async_trait;

/// Keyed table of [`UrlMapping`]s indexed by short code.
///
/// The store is deliberately dumb: it applies no expiry rules and does no
/// click accounting of its own. A `save` must be visible to every later
/// `find_by_short_code` / `exists_by_short_code`, and writes to different
/// codes must not interfere with each other. Saving an existing code
/// overwrites it.
///
/// Expired records may remain physically present indefinitely; callers decide
/// what an expired record means.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::InMemoryMappingStore`] - sharded in-process map
/// - [`crate::infrastructure::store::RedisMappingStore`] - Redis, JSON values
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Inserts or overwrites the mapping under its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn save(&self, mapping: UrlMapping) -> Result<(), AppError>;

    /// Stores the mapping only if no record holds its code yet.
    ///
    /// The check and the write are a single atomic step: of several concurrent
    /// inserts for one code exactly one returns `true`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn insert_if_absent(&self, mapping: UrlMapping) -> Result<bool, AppError>;

    /// Finds a mapping by short code, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError>;

    /// Returns true if any record, expired or not, holds this code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn exists_by_short_code(&self, short_code: &str) -> Result<bool, AppError>;

    /// Atomically adds one to the stored click count.
    ///
    /// Returns the new count, or `None` if no record holds the code.
    /// Concurrent increments of the same code never lose updates.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn increment_click_count(&self, short_code: &str) -> Result<Option<u64>, AppError>;

    /// Checks whether the backend is reachable.
    async fn health_check(&self) -> bool;
}
