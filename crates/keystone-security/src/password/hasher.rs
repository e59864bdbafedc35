//! Password hashing using Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use keystone_core::{Interface, KeystoneError, KeystoneResult};
use shaku::Component;
use std::sync::Arc;
use tracing::debug;

/// Interface for password hashing operations.
///
/// This trait abstracts password hashing functionality for dependency injection.
pub trait PasswordHasherInterface: Interface + Send + Sync {
    /// Hashes a password with a fresh random salt.
    fn hash(&self, password: &str) -> KeystoneResult<String>;

    /// Verifies a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> KeystoneResult<bool>;
}

/// Password hasher service using Argon2id.
#[derive(Component, Clone)]
#[shaku(interface = PasswordHasherInterface)]
pub struct PasswordHasher {
    argon2: Arc<Argon2<'static>>,
}

impl PasswordHasher {
    /// Iterations used by [`PasswordHasher::with_cost`].
    pub const TIME_COST: u32 = 2;

    /// Creates a new password hasher with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(Params::DEFAULT)
    }

    /// Creates a new password hasher with custom parameters.
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        Self {
            argon2: Arc::new(argon2),
        }
    }

    /// Creates a password hasher from a cost parameter (memory cost in MiB).
    ///
    /// A cost of 19 reproduces `Params::DEFAULT`.
    #[must_use]
    pub fn with_cost(cost: u32) -> Self {
        let params = Params::new(
            cost.saturating_mul(1024), // Memory cost in KiB
            Self::TIME_COST,
            1,    // Parallelism
            None, // Output length (default)
        )
        .unwrap_or(Params::DEFAULT);

        Self::with_params(params)
    }

    /// Returns the internal Argon2 instance wrapped in Arc.
    ///
    /// This is used for Shaku component parameter extraction.
    #[must_use]
    pub fn argon2_arc(&self) -> Arc<Argon2<'static>> {
        Arc::clone(&self.argon2)
    }

    /// Hashes a password.
    pub fn hash(&self, password: &str) -> KeystoneResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| KeystoneError::Internal(format!("Failed to hash password: {e}")))?;

        debug!("Password hashed successfully");
        Ok(hash.to_string())
    }

    /// Verifies a password against a hash.
    pub fn verify(&self, password: &str, hash: &str) -> KeystoneResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| KeystoneError::Internal(format!("Invalid password hash format: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password verification failed: incorrect password");
                Ok(false)
            }
            Err(e) => Err(KeystoneError::Internal(format!("Password verification error: {e}"))),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherInterface for PasswordHasher {
    fn hash(&self, password: &str) -> KeystoneResult<String> {
        Self::hash(self, password)
    }

    fn verify(&self, password: &str, hash: &str) -> KeystoneResult<bool> {
        Self::verify(self, password, hash)
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}
