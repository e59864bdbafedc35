//! User entity.

use super::super::value_objects::{Email, PhoneNumber};
use crate::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

/// A persisted user record.
///
/// `password_hash` only ever holds a salted hash; plaintext never reaches
/// this type.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    /// Identifier assigned by the Record Store.
    pub id: UserId,

    /// User's first name.
    pub first_name: String,

    /// User's last name.
    pub last_name: String,

    /// User's middle name.
    pub middle_name: Option<String>,

    /// User's date of birth.
    pub birthday: Option<NaiveDate>,

    /// User's email address (unique).
    pub email: Email,

    /// User's phone number in E.164 form (unique when present).
    pub phone_number: Option<PhoneNumber>,

    /// Salted password hash (never exposed via API).
    pub password_hash: String,

    /// Creation timestamp assigned by the Record Store.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Materializes a persisted user from an insert payload and the
    /// store-assigned identity.
    #[must_use]
    pub fn from_new(id: UserId, new_user: NewUser, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            middle_name: new_user.middle_name,
            birthday: new_user.birthday,
            email: new_user.email,
            phone_number: new_user.phone_number,
            password_hash: new_user.password_hash,
            created_at,
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("middle_name", &self.middle_name)
            .field("birthday", &self.birthday)
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .field("password_hash", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Insert payload for the Record Store.
///
/// Carries an already-hashed password; identity and creation time are
/// assigned by the store.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub email: Email,
    pub phone_number: Option<PhoneNumber>,
    pub password_hash: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user() -> NewUser {
        NewUser {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            middle_name: Some("Brewster".to_string()),
            birthday: NaiveDate::from_ymd_opt(1906, 12, 9),
            email: Email::new("grace@example.com").unwrap(),
            phone_number: Some(PhoneNumber::new("+12025550143").unwrap()),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        }
    }

    #[test]
    fn test_from_new_keeps_every_field() {
        let new = new_user();
        let now = Utc::now();
        let user = User::from_new(UserId::new(1).unwrap(), new.clone(), now);

        assert_eq!(user.id.get(), 1);
        assert_eq!(user.first_name, new.first_name);
        assert_eq!(user.middle_name, new.middle_name);
        assert_eq!(user.birthday, new.birthday);
        assert_eq!(user.email, new.email);
        assert_eq!(user.phone_number, new.phone_number);
        assert_eq!(user.password_hash, new.password_hash);
        assert_eq!(user.created_at, now);
    }

    #[test]
    fn test_debug_does_not_expose_password_hash() {
        let user = User::from_new(UserId::new(1).unwrap(), new_user(), Utc::now());
        let rendered = format!("{user:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("argon2id"));

        let rendered = format!("{:?}", new_user());
        assert!(!rendered.contains("argon2id"));
    }
}
