//! # Keystone Service
//!
//! Cache-aside coordination for user records.
//!
//! The PostgreSQL Record Store is the source of truth; Redis is a
//! possibly-stale accelerator in front of it. Reads consult the cache first
//! and fall back to the store, writes persist first and populate the cache
//! afterwards. Cache failures never fail an operation.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod user_service;

pub use cache::*;
pub use dto::*;
pub use r#impl::{UserServiceImpl, UserServiceImplParameters};
pub use user_service::*;
