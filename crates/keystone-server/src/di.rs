//! Dependency injection module using Shaku.
//!
//! Pools are created outside the module (they are async or fallible) and
//! handed in as component parameters.

use deadpool_redis::Pool;
use keystone_config::AppConfig;
use keystone_core::KeystoneResult;
use keystone_repository::{
    DatabasePool, DatabasePoolInterface, DatabasePoolParameters, PostgresUserRepository,
};
use keystone_security::{PasswordHasher, PasswordHasherParameters};
use keystone_service::{
    create_redis_pool, CachePolicy, RedisCacheStore, RedisCacheStoreParameters, UserService,
    UserServiceImpl, UserServiceImplParameters,
};
use shaku::{module, HasComponent};
use std::sync::Arc;
use tracing::info;

module! {
    pub AppModule {
        components = [
            DatabasePool,
            PostgresUserRepository,
            PasswordHasher,
            RedisCacheStore,
            UserServiceImpl,
        ],
        providers = [],
    }
}

/// Connects to PostgreSQL and Redis, then builds the module.
pub async fn build_app_module(config: &AppConfig) -> KeystoneResult<Arc<AppModule>> {
    let db_pool = DatabasePool::new(&config.database).await?;

    let cache_pool = if config.redis.enabled {
        Some(Arc::new(create_redis_pool(&config.redis)?))
    } else {
        info!("Redis disabled, reads go straight to PostgreSQL");
        None
    };

    Ok(Arc::new(assemble_module(db_pool, cache_pool, config)))
}

/// Builds the module from already-created pools.
pub fn assemble_module(
    db_pool: DatabasePool,
    cache_pool: Option<Arc<Pool>>,
    config: &AppConfig,
) -> AppModule {
    let password_hasher = PasswordHasher::with_cost(config.security.password_hash_cost);

    AppModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.pg_pool(),
        })
        .with_component_parameters::<PasswordHasher>(PasswordHasherParameters {
            argon2: password_hasher.argon2_arc(),
        })
        .with_component_parameters::<RedisCacheStore>(RedisCacheStoreParameters { pool: cache_pool })
        .with_component_parameters::<UserServiceImpl>(UserServiceImplParameters {
            policy: CachePolicy::from(&config.cache),
        })
        .build()
}

/// Resolves the components the server needs outside of request handling.
pub trait ServerResolver {
    /// Resolves the cache-aside user service.
    fn user_service(&self) -> Arc<dyn UserService>;

    /// Resolves the database pool.
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface>;
}

impl ServerResolver for AppModule {
    fn user_service(&self) -> Arc<dyn UserService> {
        self.resolve()
    }

    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystone_repository::UserRepository;
    use keystone_security::PasswordHasherInterface;
    use keystone_service::CacheStore;
    use sqlx::postgres::PgPoolOptions;

    fn lazy_pool(config: &AppConfig) -> DatabasePool {
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();
        DatabasePool::with_pool(pool)
    }

    #[test]
    fn test_has_component_trait_bounds() {
        fn _assert_has_user_service<T: HasComponent<dyn UserService>>() {}
        fn _assert_has_user_repository<T: HasComponent<dyn UserRepository>>() {}
        fn _assert_has_password_hasher<T: HasComponent<dyn PasswordHasherInterface>>() {}
        fn _assert_has_database_pool<T: HasComponent<dyn DatabasePoolInterface>>() {}
        fn _assert_has_cache<T: HasComponent<dyn CacheStore>>() {}

        _assert_has_user_service::<AppModule>();
        _assert_has_user_repository::<AppModule>();
        _assert_has_password_hasher::<AppModule>();
        _assert_has_database_pool::<AppModule>();
        _assert_has_cache::<AppModule>();
    }

    #[tokio::test]
    async fn test_disabled_redis_resolves_disabled_cache() {
        let config = AppConfig::default();
        let module = assemble_module(lazy_pool(&config), None, &config);

        let cache: Arc<dyn CacheStore> = module.resolve();
        assert!(!cache.is_enabled());
    }

    #[tokio::test]
    async fn test_enabled_redis_resolves_live_cache() {
        let config = AppConfig::default();
        let redis = Arc::new(create_redis_pool(&config.redis).unwrap());
        let module = assemble_module(lazy_pool(&config), Some(redis), &config);

        let cache: Arc<dyn CacheStore> = module.resolve();
        assert!(cache.is_enabled());
    }

    #[tokio::test]
    async fn test_configured_hash_cost_is_applied() {
        let mut config = AppConfig::default();
        config.security.password_hash_cost = 1;
        let module = assemble_module(lazy_pool(&config), None, &config);

        let hasher: Arc<dyn PasswordHasherInterface> = module.resolve();
        let hash = hasher.hash("secret").unwrap();
        assert!(hash.contains("m=1024"));
        assert!(hasher.verify("secret", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_invalid_id_rejected_before_store() {
        // The lazy pool never connects, so reaching the store would fail differently.
        let config = AppConfig::default();
        let module = assemble_module(lazy_pool(&config), None, &config);

        let err = module.user_service().get_user(0).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
