//! Phone number value object.

use crate::is_e164;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for phone number validation.
#[derive(Debug, Error)]
#[error("Invalid phone number: {0}")]
pub struct PhoneNumberError(String);

/// Phone number in E.164 form (`+14155552671`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Creates a phone number after checking the E.164 shape.
    pub fn new(value: impl Into<String>) -> Result<Self, PhoneNumberError> {
        let value = value.into().trim().to_string();
        if !is_e164(&value) {
            return Err(PhoneNumberError(value));
        }
        Ok(Self(value))
    }

    /// Creates a phone number without validation (for rows read back from the store).
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_phone_number() {
        let phone = PhoneNumber::new(" +14155552671 ").unwrap();
        assert_eq!(phone.as_str(), "+14155552671");
    }

    #[test]
    fn test_invalid_phone_number() {
        assert!(PhoneNumber::new("4155552671").is_err());
        assert!(PhoneNumber::new("+1 415 555 2671").is_err());
        let err = PhoneNumber::new("abc").unwrap_err();
        assert!(err.to_string().contains("Invalid phone number"));
    }

    #[test]
    fn test_phone_number_serde() {
        let phone = PhoneNumber::new("+442071838750").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"+442071838750\"");
        assert_eq!(serde_json::from_str::<PhoneNumber>(&json).unwrap(), phone);
        assert!(serde_json::from_str::<PhoneNumber>("\"12\"").is_err());
    }
}
