//! Cache store trait for opaque byte payloads.

use async_trait::async_trait;
use keystone_core::{CacheResult, Interface};
use std::time::Duration;

/// Key-value cache for opaque byte payloads.
///
/// A miss is `Ok(None)`; `Err` always means the backend itself failed.
#[async_trait]
pub trait CacheStore: Interface + Send + Sync {
    /// Gets the payload stored under `key`.
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, expiring after `ttl`.
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()>;

    /// Deletes `key`. Returns `true` if the key existed.
    async fn delete(&self, key: &str) -> CacheResult<bool>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}
