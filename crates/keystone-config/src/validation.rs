//! Configuration validation.
//!
//! Semantic checks that deserialization alone cannot express.

use crate::AppConfig;
use thiserror::Error;
use url::Url;

/// A configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    /// Invalid port number.
    #[error("Invalid port {port} for {name}: port must be between 1 and 65535")]
    InvalidPort { name: String, port: u16 },

    /// Missing or malformed connection URL.
    #[error("Invalid URL for {field}: {reason}")]
    InvalidUrl { field: String, reason: String },

    /// Invalid pool size.
    #[error("Invalid pool size for {name}: min ({min}) must not exceed max ({max})")]
    InvalidPoolSize { name: String, min: u32, max: u32 },

    /// Pool size too large.
    #[error("Pool size for {name} ({size}) exceeds maximum allowed ({max})")]
    PoolSizeTooLarge { name: String, size: u32, max: u32 },

    /// Zero timeout or TTL.
    #[error("Invalid duration for {field}: must be greater than zero")]
    ZeroDuration { field: String },

    /// Rate limit that would reject every request.
    #[error("Invalid rate limit for {field}: must allow at least one request")]
    ZeroRateLimit { field: String },

    /// Cache namespace unusable as a key prefix.
    #[error("Invalid cache namespace {namespace:?}: must be non-empty and must not contain ':'")]
    InvalidNamespace { namespace: String },

    /// Password hash cost out of range.
    #[error("Invalid password hash cost {cost}: must be between {min} and {max}")]
    InvalidHashCost { cost: u32, min: u32, max: u32 },

    /// Unknown log level.
    #[error("Invalid log level {level:?}: expected one of trace, debug, info, warn, error")]
    InvalidLogLevel { level: String },
}

/// Accumulates validation errors.
#[derive(Debug, Default)]
pub struct ValidationResult {
    errors: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Records an error.
    pub fn add_error(&mut self, error: ConfigValidationError) {
        self.errors.push(error);
    }

    /// Returns true when nothing was recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts into a `Result`.
    pub fn into_result(self) -> Result<(), Vec<ConfigValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Validates an `AppConfig`.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Upper bound for database pool size.
    pub const MAX_POOL_SIZE: u32 = 1000;
    /// Lower bound for the password hash cost.
    pub const MIN_HASH_COST: u32 = 1;
    /// Upper bound for the password hash cost.
    pub const MAX_HASH_COST: u32 = 64;

    const VALID_LOG_LEVELS: [&'static str; 5] = ["trace", "debug", "info", "warn", "error"];

    /// Validates the configuration, returning every problem found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_database(config, &mut result);
        Self::validate_redis(config, &mut result);
        Self::validate_cache(config, &mut result);
        Self::validate_security(config, &mut result);
        Self::validate_observability(config, &mut result);

        result.into_result()
    }

    fn validate_server(config: &AppConfig, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ConfigValidationError::InvalidPort {
                name: "server.port".to_string(),
                port: 0,
            });
        }
        if config.server.request_timeout_secs == 0 {
            result.add_error(ConfigValidationError::ZeroDuration {
                field: "server.request_timeout_secs".to_string(),
            });
        }
        if config.server.rate_limit_per_minute == 0 {
            result.add_error(ConfigValidationError::ZeroRateLimit {
                field: "server.rate_limit_per_minute".to_string(),
            });
        }
    }

    fn validate_database(config: &AppConfig, result: &mut ValidationResult) {
        let db = &config.database;

        if let Err(reason) = check_url(&db.url, &["postgres", "postgresql"]) {
            result.add_error(ConfigValidationError::InvalidUrl {
                field: "database.url".to_string(),
                reason,
            });
        }

        if db.min_connections > db.max_connections {
            result.add_error(ConfigValidationError::InvalidPoolSize {
                name: "database".to_string(),
                min: db.min_connections,
                max: db.max_connections,
            });
        }

        if db.max_connections > Self::MAX_POOL_SIZE {
            result.add_error(ConfigValidationError::PoolSizeTooLarge {
                name: "database".to_string(),
                size: db.max_connections,
                max: Self::MAX_POOL_SIZE,
            });
        }

        if db.connect_timeout_secs == 0 {
            result.add_error(ConfigValidationError::ZeroDuration {
                field: "database.connect_timeout_secs".to_string(),
            });
        }
    }

    fn validate_redis(config: &AppConfig, result: &mut ValidationResult) {
        if !config.redis.enabled {
            return;
        }

        if let Err(reason) = check_url(&config.redis.url, &["redis", "rediss"]) {
            result.add_error(ConfigValidationError::InvalidUrl {
                field: "redis.url".to_string(),
                reason,
            });
        }
    }

    fn validate_cache(config: &AppConfig, result: &mut ValidationResult) {
        let namespace = &config.cache.namespace;
        if namespace.trim().is_empty() || namespace.contains(':') {
            result.add_error(ConfigValidationError::InvalidNamespace {
                namespace: namespace.clone(),
            });
        }

        if config.cache.ttl_secs == 0 {
            result.add_error(ConfigValidationError::ZeroDuration {
                field: "cache.ttl_secs".to_string(),
            });
        }
    }

    fn validate_security(config: &AppConfig, result: &mut ValidationResult) {
        let cost = config.security.password_hash_cost;
        if !(Self::MIN_HASH_COST..=Self::MAX_HASH_COST).contains(&cost) {
            result.add_error(ConfigValidationError::InvalidHashCost {
                cost,
                min: Self::MIN_HASH_COST,
                max: Self::MAX_HASH_COST,
            });
        }
    }

    fn validate_observability(config: &AppConfig, result: &mut ValidationResult) {
        let level = config.observability.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            result.add_error(ConfigValidationError::InvalidLogLevel {
                level: config.observability.log_level.clone(),
            });
        }
    }
}

fn check_url(raw: &str, schemes: &[&str]) -> Result<(), String> {
    if raw.trim().is_empty() {
        return Err("URL is required".to_string());
    }
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !schemes.contains(&url.scheme()) {
        return Err(format!("unsupported scheme '{}', expected {}", url.scheme(), schemes.join(" or ")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors_for(config: &AppConfig) -> Vec<ConfigValidationError> {
        ConfigValidator::validate(config).unwrap_err()
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(ConfigValidator::validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(errors_for(&config).iter().any(|e| matches!(
            e,
            ConfigValidationError::InvalidPort { name, .. } if name == "server.port"
        )));
    }

    #[test]
    fn test_zero_rate_limit() {
        let mut config = AppConfig::default();
        config.server.rate_limit_per_minute = 0;
        assert_eq!(
            errors_for(&config),
            vec![ConfigValidationError::ZeroRateLimit {
                field: "server.rate_limit_per_minute".to_string()
            }]
        );
    }

    #[test]
    fn test_database_url_checks() {
        let mut config = AppConfig::default();
        config.database.url = String::new();
        assert!(matches!(
            errors_for(&config).as_slice(),
            [ConfigValidationError::InvalidUrl { field, .. }] if field == "database.url"
        ));

        config.database.url = "mysql://localhost/keystone".to_string();
        assert_eq!(errors_for(&config).len(), 1);

        config.database.url = "postgresql://localhost/keystone".to_string();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_pool_size() {
        let mut config = AppConfig::default();
        config.database.min_connections = 50;
        config.database.max_connections = 10;
        assert!(errors_for(&config)
            .iter()
            .any(|e| matches!(e, ConfigValidationError::InvalidPoolSize { .. })));

        config.database.min_connections = 1;
        config.database.max_connections = 2000;
        assert!(errors_for(&config)
            .iter()
            .any(|e| matches!(e, ConfigValidationError::PoolSizeTooLarge { .. })));
    }

    #[test]
    fn test_redis_url_skipped_when_disabled() {
        let mut config = AppConfig::default();
        config.redis.url = "http://not-redis".to_string();
        assert!(ConfigValidator::validate(&config).is_err());

        config.redis.enabled = false;
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_cache_policy_checks() {
        let mut config = AppConfig::default();
        config.cache.namespace = "users:v2".to_string();
        config.cache.ttl_secs = 0;

        let errors = errors_for(&config);
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigValidationError::InvalidNamespace { .. })));
        assert!(errors.iter().any(|e| e.to_string().contains("cache.ttl_secs")));

        config.cache.namespace = " ".to_string();
        config.cache.ttl_secs = 60;
        assert_eq!(errors_for(&config).len(), 1);
    }

    #[test]
    fn test_hash_cost_range() {
        let mut config = AppConfig::default();
        config.security.password_hash_cost = 0;
        assert!(errors_for(&config)
            .iter()
            .any(|e| matches!(e, ConfigValidationError::InvalidHashCost { cost: 0, .. })));

        config.security.password_hash_cost = 65;
        assert!(ConfigValidator::validate(&config).is_err());

        config.security.password_hash_cost = 64;
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut config = AppConfig::default();
        config.observability.log_level = "WARN".to_string();
        assert!(ConfigValidator::validate(&config).is_ok());

        config.observability.log_level = "loud".to_string();
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_all_errors_collected() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        config.cache.ttl_secs = 0;
        config.security.password_hash_cost = 0;

        let mut result = ValidationResult::default();
        assert!(result.is_valid());
        result.add_error(ConfigValidationError::ZeroDuration { field: "x".into() });
        assert!(!result.is_valid());

        assert_eq!(errors_for(&config).len(), 3);
    }
}
