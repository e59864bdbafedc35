//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Message reported for malformed or non-positive identifiers.
pub const INVALID_ID_MESSAGE: &str = "Invalid or Malformed ID format";

/// Names of the unique constraints on the `users` table.
///
/// Uniqueness violations are classified by constraint name, never by the
/// driver's message text.
pub mod constraints {
    /// Unique constraint on `users.email`.
    pub const USERS_EMAIL: &str = "users_email_key";
    /// Unique constraint on `users.phone_number`.
    pub const USERS_PHONE_NUMBER: &str = "users_phone_number_key";
}

/// Unified error type returned by the service layer.
///
/// Record Store and Cache Store failures are translated into this taxonomy
/// by the coordinator; handlers only ever see these variants.
#[derive(Error, Debug)]
pub enum KeystoneError {
    // ============ Client Errors ============
    /// Malformed, non-numeric, or non-positive identifier.
    #[error("Invalid or Malformed ID format")]
    InvalidIdentifier,

    /// Field-level validation failures.
    #[error("Validation error: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// A record with the same email already exists.
    #[error("Email '{0}' already exists")]
    DuplicateEmail(String),

    /// A record with the same phone number already exists.
    #[error("Phone number '{0}' already exists")]
    DuplicatePhoneNumber(String),

    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Client exceeded its request quota.
    #[error("Rate limit exceeded, try again later")]
    RateLimitExceeded,

    // ============ Infrastructure Errors ============
    /// Record Store unavailable or failed for a reason other than the above.
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// Redis/Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KeystoneError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidIdentifier => 400,
            Self::NotFound { .. } => 404,
            Self::RateLimitExceeded => 429,
            Self::Validation(_) | Self::DuplicateEmail(_) | Self::DuplicatePhoneNumber(_) => 422,
            Self::Persistence(_)
            | Self::Cache(_)
            | Self::Configuration(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier => "INVALID_IDENTIFIER",
            Self::Validation(_) | Self::DuplicateEmail(_) | Self::DuplicatePhoneNumber(_) => {
                "VALIDATION_ERROR"
            }
            Self::NotFound { .. } => "NOT_FOUND",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::Persistence(_) => "PERSISTENCE_FAILURE",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the field-attributed problems carried by this error, if any.
    ///
    /// Uniqueness violations are reported against the offending field so
    /// they render like any other validation failure.
    #[must_use]
    pub fn field_errors(&self) -> Option<Vec<FieldError>> {
        match self {
            Self::Validation(errors) => Some(errors.clone()),
            Self::DuplicateEmail(_) => Some(vec![FieldError::new(
                "email",
                "email already exists, please try another one",
                "unique",
            )]),
            Self::DuplicatePhoneNumber(_) => Some(vec![FieldError::new(
                "phone_number",
                "phone_number already exists, please try another one",
                "unique",
            )]),
            _ => None,
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error for a single field.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message, "invalid")])
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Tagged failure of a Record Store operation.
///
/// Absence of a record is not an error: lookups return `Option`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The email unique constraint fired.
    #[error("duplicate email")]
    DuplicateEmail,

    /// The phone number unique constraint fired.
    #[error("duplicate phone number")]
    DuplicatePhoneNumber,

    /// Any other store failure.
    #[error("database error: {0}")]
    Database(String),
}

impl StoreError {
    /// Classifies a unique violation by the name of the violated constraint.
    #[must_use]
    pub fn from_constraint(constraint: Option<&str>, message: impl Into<String>) -> Self {
        match constraint {
            Some(constraints::USERS_EMAIL) => Self::DuplicateEmail,
            Some(constraints::USERS_PHONE_NUMBER) => Self::DuplicatePhoneNumber,
            _ => Self::Database(message.into()),
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::from_constraint(db_err.constraint(), db_err.message())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

/// Failure of a Cache Store operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The cache backend could not be reached or rejected the command.
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// Caching is switched off in configuration.
    #[error("cache is disabled")]
    Disabled,
}

impl From<CacheError> for KeystoneError {
    fn from(err: CacheError) -> Self {
        Self::Cache(err.to_string())
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
    /// Request path that produced the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Field-level validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl FieldError {
    /// Creates a new field error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

impl ErrorResponse {
    /// Creates a new error response from a `KeystoneError`.
    #[must_use]
    pub fn from_error(error: &KeystoneError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: error.field_errors(),
            path: None,
        }
    }

    /// Sets the request path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl From<&KeystoneError> for ErrorResponse {
    fn from(error: &KeystoneError) -> Self {
        Self::from_error(error)
    }
}
