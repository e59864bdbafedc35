//! Caching infrastructure for the service layer.
//!
//! A byte-oriented cache capability with a Redis implementation, the key
//! policy for the user namespace, and the codec for cached records.

mod cache_store;
pub mod cache_keys;
pub mod codec;
mod redis_cache;

pub use cache_keys::{CachePolicy, DEFAULT_NAMESPACE, DEFAULT_TTL};
pub use cache_store::CacheStore;
pub use codec::CodecError;
pub use redis_cache::{create_redis_pool, RedisCacheStore, RedisCacheStoreParameters};
