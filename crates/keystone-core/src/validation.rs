//! Validation utilities.

use crate::{FieldError, KeystoneError};
use validator::{Validate, ValidationError, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `KeystoneError::Validation` on failure.
    fn validate_request(&self) -> Result<(), KeystoneError> {
        self.validate()
            .map_err(|e| KeystoneError::Validation(validation_errors_to_field_errors(&e)))
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` into a list of (field, message) problems.
///
/// The list is sorted by field name so responses are stable.
#[must_use]
pub fn validation_errors_to_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            let field = field.to_string();
            errors.iter().map(move |error| FieldError {
                field: field.clone(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| describe(&field, error), ToString::to_string),
                code: error.code.to_string(),
            })
        })
        .collect();

    field_errors.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    field_errors
}

/// Renders a human message for a failed rule.
fn describe(field: &str, error: &ValidationError) -> String {
    match error.code.as_ref() {
        "required" => format!("{field} is required"),
        "length" => describe_length(field, error),
        "email" => format!("{field} is not a valid email address"),
        "e164" => format!("{field} must be a valid phone number"),
        "url" => format!("{field} is not a valid URL"),
        _ => format!("Validation failed for {field} field"),
    }
}

/// Names the bound a string broke. `validator` counts chars, so do we.
fn describe_length(field: &str, error: &ValidationError) -> String {
    let bound = |name: &str| error.params.get(name).and_then(|v| v.as_u64());
    let len = error
        .params
        .get("value")
        .and_then(|v| v.as_str())
        .and_then(|s| u64::try_from(s.chars().count()).ok());

    match (bound("min"), bound("max"), len) {
        (_, Some(max), Some(len)) if len > max => {
            format!("{field} should be at most {max} characters")
        }
        (Some(1), _, _) => format!("{field} is required"),
        (Some(min), _, _) => format!("{field} should be at least {min} characters"),
        (None, Some(max), _) => format!("{field} should be at most {max} characters"),
        (None, None, _) => format!("{field} has an invalid length"),
    }
}

/// Checks the E.164 phone number shape: `+` followed by 7 to 15 digits.
#[must_use]
pub fn is_e164(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('+') else {
        return false;
    };
    (7..=15).contains(&digits.len())
        && !digits.starts_with('0')
        && digits.chars().all(|c| c.is_ascii_digit())
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates an E.164 phone number.
    pub fn e164(value: &str) -> Result<(), ValidationError> {
        if super::is_e164(value) {
            Ok(())
        } else {
            Err(ValidationError::new("e164"))
        }
    }
}
