//! Redis-based cache implementation.

use super::CacheStore;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Config, Pool, PoolConfig, Runtime};
use keystone_config::RedisConfig;
use keystone_core::{CacheError, CacheResult, KeystoneError, KeystoneResult};
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Creates a Redis connection pool from configuration.
pub fn create_redis_pool(config: &RedisConfig) -> KeystoneResult<Pool> {
    let mut cfg = Config::from_url(config.url.as_str());
    cfg.pool = Some(PoolConfig::new(config.pool_size));

    let pool = cfg
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| KeystoneError::Cache(format!("Failed to create Redis pool: {e}")))?;

    info!("Redis connection pool created");
    Ok(pool)
}

/// Redis-based cache store.
#[derive(Component, Default)]
#[shaku(interface = CacheStore)]
pub struct RedisCacheStore {
    /// Redis connection pool. `None` when caching is disabled.
    pool: Option<Arc<Pool>>,
}

impl RedisCacheStore {
    /// Create a new Redis cache store.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a no-op cache store (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Returns the pool handle for Shaku component parameters.
    #[must_use]
    pub fn pool_arc(&self) -> Option<Arc<Pool>> {
        self.pool.clone()
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> CacheResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool
                .get()
                .await
                .map_err(|e| CacheError::Unavailable(format!("Failed to get Redis connection: {e}"))),
            None => Err(CacheError::Disabled),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<Vec<u8>> = conn
            .get(key)
            .await
            .map_err(|e| CacheError::Unavailable(format!("Failed to get key '{key}': {e}")))?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        if !self.is_enabled() {
            return Err(CacheError::Disabled);
        }

        let mut conn = self.get_conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| CacheError::Unavailable(format!("Failed to set key '{key}': {e}")))?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| CacheError::Unavailable(format!("Failed to delete key '{key}': {e}")))?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }
}

impl std::fmt::Debug for RedisCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheStore")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
