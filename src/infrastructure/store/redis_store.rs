//! Redis-backed mapping store.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, Script, aio::ConnectionManager};
use tracing::{debug, info, warn};

use crate::domain::entities::UrlMapping;
use crate::domain::repositories::MappingStore;
use crate::error::AppError;

/// Increments `click_count` inside the stored JSON document in one server-side
/// step. Returns -1 when the key is absent.
const INCREMENT_CLICKS_LUA: &str = r#"
local raw = redis.call('GET', KEYS[1])
if not raw then
    return -1
end
local mapping = cjson.decode(raw)
mapping.click_count = (tonumber(mapping.click_count) or 0) + 1
redis.call('SET', KEYS[1], cjson.encode(mapping))
return mapping.click_count
"#;

/// Mapping store persisting JSON documents in Redis.
///
/// Keys are `url:{short_code}`. No native key expiry is set: an expired
/// mapping must stay readable so its click count can still be reported.
pub struct RedisMappingStore {
    client: ConnectionManager,
    key_prefix: String,
    increment_script: Script,
}

impl RedisMappingStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        info!("Connecting to Redis at {}", redis_url);

        let client = Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        let mut test_conn = manager.clone();
        test_conn.ping::<()>().await?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: "url:".to_string(),
            increment_script: Script::new(INCREMENT_CLICKS_LUA),
        })
    }

    fn build_key(&self, short_code: &str) -> String {
        build_key(&self.key_prefix, short_code)
    }
}

fn build_key(prefix: &str, short_code: &str) -> String {
    format!("{}{}", prefix, short_code)
}

#[async_trait]
impl MappingStore for RedisMappingStore {
    async fn save(&self, mapping: UrlMapping) -> Result<(), AppError> {
        let key = self.build_key(&mapping.short_code);
        let payload = serde_json::to_string(&mapping)?;
        let mut conn = self.client.clone();

        conn.set::<_, _, ()>(&key, payload).await?;
        debug!("Store SET: {}", key);
        Ok(())
    }

    async fn insert_if_absent(&self, mapping: UrlMapping) -> Result<bool, AppError> {
        let key = self.build_key(&mapping.short_code);
        let payload = serde_json::to_string(&mapping)?;
        let mut conn = self.client.clone();

        let inserted: bool = conn.set_nx(&key, payload).await?;
        debug!("Store SETNX: {} inserted={}", key, inserted);
        Ok(inserted)
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        let raw: Option<String> = conn.get(&key).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => {
                debug!("Store MISS: {}", key);
                Ok(None)
            }
        }
    }

    async fn exists_by_short_code(&self, short_code: &str) -> Result<bool, AppError> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        let exists: bool = conn.exists(&key).await?;
        Ok(exists)
    }

    async fn increment_click_count(&self, short_code: &str) -> Result<Option<u64>, AppError> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        let count: i64 = self
            .increment_script
            .key(&key)
            .invoke_async(&mut conn)
            .await?;

        if count < 0 {
            warn!("Click increment on missing key {}", key);
            return Ok(None);
        }

        Ok(Some(count as u64))
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
