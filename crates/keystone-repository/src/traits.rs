//! Repository trait definitions.

use keystone_core::{Interface, NewUser, StoreResult, User, UserId};
use async_trait::async_trait;

/// Record Store capability for user records.
///
/// The store is the source of truth. Uniqueness of `email` and
/// `phone_number` is enforced here, and violations are reported as the
/// matching `StoreError` variant. Absence is `Ok(None)`, never an error.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Inserts a user and returns it with its store-assigned id and
    /// creation timestamp.
    async fn create(&self, user: &NewUser) -> StoreResult<User>;

    /// Finds a user by id.
    async fn get_by_id(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Finds a user by email (case-insensitive).
    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}
