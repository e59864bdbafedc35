//! User-related DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use keystone_core::{User, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Request to create a new user.
///
/// Required text fields default to empty so a missing key reports the same
/// "is required" problem as an empty value.
#[derive(Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub last_name: String,

    #[validate(length(min = 1, max = 255))]
    pub middle_name: Option<String>,

    pub birthday: Option<NaiveDate>,

    #[serde(default)]
    #[validate(length(min = 1, max = 255), email)]
    pub email: String,

    #[validate(custom(function = "keystone_core::rules::e164"))]
    pub phone_number: Option<String>,

    #[serde(default)]
    #[validate(length(min = 3))]
    pub password: String,
}

impl fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("middle_name", &self.middle_name)
            .field("birthday", &self.birthday)
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// User response DTO. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            middle_name: user.middle_name,
            birthday: user.birthday,
            email: user.email.into(),
            phone_number: user.phone_number.map(Into::into),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystone_core::{Email, KeystoneError, PhoneNumber, ValidateExt};

    fn valid_request() -> CreateUserRequest {
        CreateUserRequest {
            first_name: "Alan".to_string(),
            last_name: "Turing".to_string(),
            middle_name: Some("Mathison".to_string()),
            birthday: NaiveDate::from_ymd_opt(1912, 6, 23),
            email: "alan@example.com".to_string(),
            phone_number: Some("+442079460001".to_string()),
            password: "enigma".to_string(),
        }
    }

    fn messages(request: &CreateUserRequest) -> Vec<(String, String)> {
        match request.validate_request() {
            Err(KeystoneError::Validation(details)) => {
                details.into_iter().map(|d| (d.field, d.message)).collect()
            }
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate_request().is_ok());
    }

    #[test]
    fn test_missing_fields_are_required() {
        let request: CreateUserRequest = serde_json::from_str("{}").unwrap();
        let problems = messages(&request);
        assert!(problems.contains(&("first_name".into(), "first_name is required".into())));
        assert!(problems.contains(&("last_name".into(), "last_name is required".into())));
        assert!(problems.contains(&("email".into(), "email is required".into())));
        assert!(problems.iter().any(|(f, _)| f == "password"));
    }

    #[test]
    fn test_field_messages() {
        let mut request = valid_request();
        request.email = "not-an-email".to_string();
        request.password = "ab".to_string();
        request.phone_number = Some("12345".to_string());

        let problems = messages(&request);
        assert_eq!(
            problems,
            vec![
                ("email".to_string(), "email is not a valid email address".to_string()),
                ("password".to_string(), "password should be at least 3 characters".to_string()),
                ("phone_number".to_string(), "phone_number must be a valid phone number".to_string()),
            ]
        );
    }

    #[test]
    fn test_names_longer_than_column_are_rejected() {
        let mut request = valid_request();
        request.first_name = "a".repeat(256);
        request.middle_name = Some("b".repeat(300));

        let problems = messages(&request);
        assert_eq!(
            problems,
            vec![
                ("first_name".to_string(), "first_name should be at most 255 characters".to_string()),
                ("middle_name".to_string(), "middle_name should be at most 255 characters".to_string()),
            ]
        );
    }

    #[test]
    fn test_names_at_column_width_pass() {
        let mut request = valid_request();
        request.first_name = "a".repeat(255);
        request.last_name = "é".repeat(255);
        assert!(request.validate_request().is_ok());
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let mut request = valid_request();
        request.middle_name = None;
        request.birthday = None;
        request.phone_number = None;
        assert!(request.validate_request().is_ok());
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", valid_request());
        assert!(!rendered.contains("enigma"));
    }

    #[test]
    fn test_response_has_no_password() {
        let user = User {
            id: UserId::new(1).unwrap(),
            first_name: "Alan".to_string(),
            last_name: "Turing".to_string(),
            middle_name: None,
            birthday: None,
            email: Email::new("alan@example.com").unwrap(),
            phone_number: Some(PhoneNumber::new("+442079460001").unwrap()),
            password_hash: "$argon2id$secret-hash".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("password_hash"));
        assert!(!json.to_string().contains("secret-hash"));
        assert!(!object.contains_key("middle_name"));
        assert_eq!(json["phone_number"], "+442079460001");
        assert_eq!(json["id"], 1);
    }
}
