//! Result type aliases for Keystone.

use crate::{CacheError, KeystoneError, StoreError};

/// A specialized `Result` type for service-level operations.
pub type KeystoneResult<T> = Result<T, KeystoneError>;

/// Result of a Record Store operation.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result of a Cache Store operation.
pub type CacheResult<T> = Result<T, CacheError>;
