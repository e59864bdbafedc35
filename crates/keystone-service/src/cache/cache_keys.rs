//! Cache key policy for user records.
//!
//! Keys are a pure function of `(namespace, id)` so every process sharing a
//! Redis instance computes the same key for the same record.

use keystone_config::CacheConfig;
use keystone_core::UserId;
use std::time::Duration;

/// Namespace for user record keys.
pub const DEFAULT_NAMESPACE: &str = "users";

/// TTL applied to every user record write (7 days).
pub const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Generate the cache key for a user by ID.
#[must_use]
pub fn user_by_id(namespace: &str, id: UserId) -> String {
    format!("{namespace}:{id}")
}

/// Namespace and TTL applied uniformly to cache writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    pub namespace: String,
    pub ttl: Duration,
}

impl CachePolicy {
    /// Creates a policy.
    #[must_use]
    pub fn new(namespace: impl Into<String>, ttl: Duration) -> Self {
        Self {
            namespace: namespace.into(),
            ttl,
        }
    }

    /// Returns the key for a user in this policy's namespace.
    #[must_use]
    pub fn key_for(&self, id: UserId) -> String {
        user_by_id(&self.namespace, id)
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE, DEFAULT_TTL)
    }
}

impl From<&CacheConfig> for CachePolicy {
    fn from(config: &CacheConfig) -> Self {
        Self::new(config.namespace.clone(), config.ttl())
    }
}
