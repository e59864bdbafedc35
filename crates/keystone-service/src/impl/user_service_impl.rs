//! Cache-aside user service implementation.

use crate::cache::{codec, CachePolicy, CacheStore};
use crate::dto::CreateUserRequest;
use crate::user_service::{CacheWriteWarning, CreateUserOutcome, UserService};
use async_trait::async_trait;
use keystone_core::{
    Email, KeystoneError, KeystoneResult, NewUser, PhoneNumber, StoreError, User, UserId, ValidateExt,
};
use keystone_repository::UserRepository;
use keystone_security::PasswordHasherInterface;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Cache-aside user service.
///
/// Stateless apart from its collaborators; safe to share across requests.
#[derive(Component)]
#[shaku(interface = UserService)]
pub struct UserServiceImpl {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    password_hasher: Arc<dyn PasswordHasherInterface>,
    #[shaku(inject)]
    cache: Arc<dyn CacheStore>,
    policy: CachePolicy,
}

impl UserServiceImpl {
    /// Creates a new user service.
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
        cache: Arc<dyn CacheStore>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            cache,
            policy,
        }
    }

    /// Writes `user` to the cache under the policy's key and TTL.
    async fn populate_cache(&self, user: &User) -> Result<(), CacheWriteWarning> {
        if !self.cache.is_enabled() {
            return Ok(());
        }

        let key = self.policy.key_for(user.id);
        let payload = codec::encode(user).map_err(|e| CacheWriteWarning::new(&key, e.to_string()))?;

        self.cache
            .set(&key, &payload, self.policy.ttl)
            .await
            .map_err(|e| CacheWriteWarning::new(key, e.to_string()))
    }

    /// Hashes `password` on the blocking pool.
    async fn hash_password(&self, password: String) -> KeystoneResult<String> {
        let hasher = Arc::clone(&self.password_hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| KeystoneError::internal(format!("Password hashing task failed: {e}")))?
    }

    /// Looks `id` up in the cache. Every failure is a miss.
    async fn cached_user(&self, id: UserId) -> Option<User> {
        let key = self.policy.key_for(id);

        let bytes = match self.cache.get(&key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("Cache miss for user: {}", id);
                return None;
            }
            Err(e) => {
                warn!("Cache lookup for '{}' failed, reading from store: {}", key, e);
                return None;
            }
        };

        match codec::decode(&bytes) {
            Ok(user) if user.id == id => {
                debug!("Cache hit for user: {}", id);
                Some(user)
            }
            Ok(user) => {
                warn!("Cache entry '{}' holds user {}, ignoring", key, user.id);
                None
            }
            Err(e) => {
                warn!("Discarding undecodable cache entry '{}': {}", key, e);
                None
            }
        }
    }
}

/// Builds the insert payload from a validated request and the password hash.
fn new_user_from_request(request: CreateUserRequest, email: Email, password_hash: String) -> KeystoneResult<NewUser> {
    let phone_number = request
        .phone_number
        .map(PhoneNumber::new)
        .transpose()
        .map_err(|_| KeystoneError::validation("phone_number", "phone_number must be a valid phone number"))?;

    Ok(NewUser {
        first_name: request.first_name,
        last_name: request.last_name,
        middle_name: request.middle_name,
        birthday: request.birthday,
        email,
        phone_number,
        password_hash,
    })
}

/// Classifies a store failure raised while inserting `user`.
fn insert_error(err: StoreError, user: &NewUser) -> KeystoneError {
    match err {
        StoreError::DuplicateEmail => KeystoneError::DuplicateEmail(user.email.to_string()),
        StoreError::DuplicatePhoneNumber => KeystoneError::DuplicatePhoneNumber(
            user.phone_number
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        ),
        StoreError::Database(msg) => KeystoneError::Persistence(msg),
    }
}

/// Classifies a store failure raised by a lookup.
fn lookup_error(err: StoreError) -> KeystoneError {
    KeystoneError::Persistence(err.to_string())
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn create_user(&self, request: CreateUserRequest) -> KeystoneResult<CreateUserOutcome> {
        request.validate_request()?;

        let email = Email::new(&request.email)
            .map_err(|_| KeystoneError::validation("email", "email is not a valid email address"))?;

        // Friendlier error for the common case; the unique constraint is the real guard.
        if self
            .user_repository
            .get_by_email(email.as_str())
            .await
            .map_err(lookup_error)?
            .is_some()
        {
            debug!("Email already registered");
            return Err(KeystoneError::DuplicateEmail(email.to_string()));
        }

        let password_hash = self.hash_password(request.password.clone()).await?;
        let new_user = new_user_from_request(request, email, password_hash)?;

        let user = self
            .user_repository
            .create(&new_user)
            .await
            .map_err(|e| insert_error(e, &new_user))?;

        info!("User created: {}", user.id);

        let cache_warning = self.populate_cache(&user).await.err();
        if let Some(warning) = &cache_warning {
            debug!("User {} persisted but not cached: {}", user.id, warning);
        }

        Ok(CreateUserOutcome { user, cache_warning })
    }

    #[instrument(skip(self))]
    async fn get_user(&self, id: i64) -> KeystoneResult<User> {
        let id = UserId::new(id)?;

        if let Some(user) = self.cached_user(id).await {
            return Ok(user);
        }

        let user = self
            .user_repository
            .get_by_id(id)
            .await
            .map_err(lookup_error)?
            .ok_or_else(|| KeystoneError::not_found("User", id))?;

        if let Err(warning) = self.populate_cache(&user).await {
            warn!("Cache write-back for user {} failed: {}", id, warning);
        }

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_user_by_email(&self, email: &str) -> KeystoneResult<User> {
        self.user_repository
            .get_by_email(email)
            .await
            .map_err(lookup_error)?
            .ok_or_else(|| KeystoneError::not_found("User", email))
    }

    #[instrument(skip(self))]
    async fn evict_user(&self, id: UserId) -> bool {
        let key = self.policy.key_for(id);
        match self.cache.delete(&key).await {
            Ok(deleted) => deleted,
            Err(e) => {
                warn!("Failed to evict '{}': {}", key, e);
                false
            }
        }
    }
}

impl std::fmt::Debug for UserServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceImpl")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
