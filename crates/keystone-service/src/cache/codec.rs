//! Serialization codec for cached user records.
//!
//! Payloads are JSON envelopes `{"v": 1, "user": {...}}`. Anything that is
//! not exactly the current shape fails to decode, and the coordinator treats
//! a decode failure as a miss so stale payloads are replaced on the next read.

use chrono::{DateTime, NaiveDate, Utc};
use keystone_core::{Email, PhoneNumber, User, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current payload version.
pub const CODEC_VERSION: u32 = 1;

/// Failure to encode or decode a cached payload.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Bytes are not a well-formed envelope.
    #[error("malformed cache payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Envelope written by a different codec version.
    #[error("unsupported cache payload version {0}")]
    UnsupportedVersion(u32),

    /// A field decoded but holds a value the entity rejects.
    #[error("invalid field in cache payload: {0}")]
    InvalidField(&'static str),
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    v: u32,
    user: CachedUser,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CachedUser {
    id: i64,
    first_name: String,
    last_name: String,
    middle_name: Option<String>,
    birthday: Option<NaiveDate>,
    email: String,
    phone_number: Option<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<&User> for CachedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            middle_name: user.middle_name.clone(),
            birthday: user.birthday,
            email: user.email.as_str().to_string(),
            phone_number: user.phone_number.as_ref().map(|p| p.as_str().to_string()),
            password_hash: user.password_hash.clone(),
            created_at: user.created_at,
        }
    }
}

impl TryFrom<CachedUser> for User {
    type Error = CodecError;

    fn try_from(cached: CachedUser) -> Result<Self, Self::Error> {
        let id = UserId::new(cached.id).map_err(|_| CodecError::InvalidField("id"))?;
        let email = Email::new(cached.email).map_err(|_| CodecError::InvalidField("email"))?;
        let phone_number = cached
            .phone_number
            .map(PhoneNumber::new)
            .transpose()
            .map_err(|_| CodecError::InvalidField("phone_number"))?;

        Ok(User {
            id,
            first_name: cached.first_name,
            last_name: cached.last_name,
            middle_name: cached.middle_name,
            birthday: cached.birthday,
            email,
            phone_number,
            password_hash: cached.password_hash,
            created_at: cached.created_at,
        })
    }
}

/// Encodes a user into a cache payload.
pub fn encode(user: &User) -> Result<Vec<u8>, CodecError> {
    let envelope = Envelope {
        v: CODEC_VERSION,
        user: CachedUser::from(user),
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Decodes a cache payload.
pub fn decode(bytes: &[u8]) -> Result<User, CodecError> {
    let envelope: Envelope = serde_json::from_slice(bytes)?;
    if envelope.v != CODEC_VERSION {
        return Err(CodecError::UnsupportedVersion(envelope.v));
    }
    User::try_from(envelope.user)
}
