//! In-process mapping store.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use crate::domain::entities::UrlMapping;
use crate::domain::repositories::MappingStore;
use crate::error::AppError;

/// Mapping store held in a sharded concurrent map.
///
/// Used when no Redis URL is configured and throughout the tests. Writes to
/// different codes land on independent shards; a click increment holds the
/// shard lock for the one entry it touches. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryMappingStore {
    mappings: DashMap<String, UrlMapping>,
}

impl InMemoryMappingStore {
    pub fn new() -> Self {
        debug!("Using in-memory mapping store");
        Self {
            mappings: DashMap::new(),
        }
    }

    /// Number of stored records, expired ones included.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

#[async_trait]
impl MappingStore for InMemoryMappingStore {
    async fn save(&self, mapping: UrlMapping) -> Result<(), AppError> {
        self.mappings.insert(mapping.short_code.clone(), mapping);
        Ok(())
    }

    async fn insert_if_absent(&self, mapping: UrlMapping) -> Result<bool, AppError> {
        match self.mappings.entry(mapping.short_code.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(mapping);
                Ok(true)
            }
        }
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError> {
        Ok(self.mappings.get(short_code).map(|m| m.value().clone()))
    }

    async fn exists_by_short_code(&self, short_code: &str) -> Result<bool, AppError> {
        Ok(self.mappings.contains_key(short_code))
    }

    async fn increment_click_count(&self, short_code: &str) -> Result<Option<u64>, AppError> {
        Ok(self.mappings.get_mut(short_code).map(|mut m| {
            m.click_count += 1;
            m.click_count
        }))
    }

    async fn health_check(&self) -> bool {
        true
    }
}
