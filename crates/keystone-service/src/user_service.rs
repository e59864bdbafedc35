//! User service trait definition.

use crate::dto::CreateUserRequest;
use async_trait::async_trait;
use keystone_core::{Interface, KeystoneResult, User, UserId};
use thiserror::Error;

/// Cache population failed after the record was durably persisted.
///
/// Never fails the create; returned beside the created record so the caller
/// can log it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to cache '{key}': {reason}")]
pub struct CacheWriteWarning {
    pub key: String,
    pub reason: String,
}

impl CacheWriteWarning {
    /// Creates a warning for `key`.
    #[must_use]
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result of a successful create.
#[derive(Debug, Clone)]
pub struct CreateUserOutcome {
    /// The record as persisted, with its assigned id.
    pub user: User,
    /// Present when the record could not be written to the cache.
    pub cache_warning: Option<CacheWriteWarning>,
}

/// Cache-aside coordinator for user records.
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    /// Validates, hashes the password, persists, then populates the cache.
    ///
    /// Fails with `DuplicateEmail` or `DuplicatePhoneNumber` on a uniqueness
    /// violation and `Persistence` on any other store failure. A cache
    /// failure is reported through [`CreateUserOutcome::cache_warning`].
    async fn create_user(&self, request: CreateUserRequest) -> KeystoneResult<CreateUserOutcome>;

    /// Gets a user by id, from the cache when possible.
    ///
    /// Non-positive ids fail with `InvalidIdentifier` before any store call.
    async fn get_user(&self, id: i64) -> KeystoneResult<User>;

    /// Gets a user by email straight from the store.
    async fn get_user_by_email(&self, email: &str) -> KeystoneResult<User>;

    /// Removes a user's cache entry, best-effort. Returns `true` if an entry
    /// was deleted.
    async fn evict_user(&self, id: UserId) -> bool;
}
