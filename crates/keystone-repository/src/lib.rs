//! # Keystone Repository
//!
//! Record Store for user records.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserRepository>
//! PostgresUserRepository   (SQLx)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! PostgreSQL
//! ```
//!
//! Uniqueness violations are classified by constraint name
//! (`users_email_key`, `users_phone_number_key`) into
//! [`StoreError`](keystone_core::StoreError) variants.

pub mod pool;
pub mod postgres;
pub mod traits;

pub use pool::*;
pub use postgres::*;
pub use traits::*;

