//! PostgreSQL user repository implementation.

use crate::{traits::UserRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use keystone_core::{Email, NewUser, PhoneNumber, StoreError, StoreResult, User, UserId};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::{debug, warn};

const USER_COLUMNS: &str = "id, first_name, last_name, middle_name, birthday, email, phone_number, password, created_at";

/// PostgreSQL user repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = UserRepository)]
pub struct PostgresUserRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PostgresUserRepository {
    /// Creates a new PostgreSQL user repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    middle_name: Option<String>,
    birthday: Option<NaiveDate>,
    email: String,
    phone_number: Option<String>,
    password: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = UserId::new(row.id)
            .map_err(|_| StoreError::Database(format!("Invalid user id in database: {}", row.id)))?;

        Ok(User {
            id,
            first_name: row.first_name,
            last_name: row.last_name,
            middle_name: row.middle_name,
            birthday: row.birthday,
            email: Email::new_unchecked(row.email),
            phone_number: row.phone_number.map(PhoneNumber::new_unchecked),
            password_hash: row.password,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &NewUser) -> StoreResult<User> {
        debug!("Inserting user with email: {}", user.email);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (first_name, last_name, middle_name, birthday, email, phone_number, password)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.middle_name)
        .bind(user.birthday)
        .bind(user.email.as_str())
        .bind(user.phone_number.as_ref().map(PhoneNumber::as_str))
        .bind(&user.password_hash)
        .fetch_one(self.pool.inner())
        .await
        .map_err(|e| {
            let err = StoreError::from(e);
            if matches!(err, StoreError::Database(_)) {
                warn!("User insert failed: {}", err);
            }
            err
        })?;

        User::try_from(row)
    }

    async fn get_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        debug!("Finding user by id: {}", id);

        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(self.pool.inner())
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        debug!("Finding user by email: {}", email);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = LOWER($1)"
        ))
        .bind(email.trim())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(User::try_from).transpose()
    }
}

impl std::fmt::Debug for PostgresUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresUserRepository").finish_non_exhaustive()
    }
}
