//! Typed ID wrappers for domain entities.

use crate::KeystoneError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

/// A strongly-typed wrapper for user IDs.
///
/// IDs are assigned by the Record Store and are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Creates a user ID, rejecting zero and negative values.
    pub fn new(value: i64) -> Result<Self, KeystoneError> {
        if value <= 0 {
            return Err(KeystoneError::InvalidIdentifier);
        }
        Ok(Self(value))
    }

    /// Parses a user ID from a path segment.
    pub fn parse(s: &str) -> Result<Self, KeystoneError> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| KeystoneError::InvalidIdentifier)?;
        Self::new(value)
    }

    /// Returns the inner value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = KeystoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<i64> for UserId {
    type Error = KeystoneError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}
