//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File, Map};
use keystone_core::KeystoneError;
use std::path::Path;
use tracing::{debug, info, warn};

/// Prefix for layered environment variables (`KEYSTONE__SERVER__PORT`).
pub const ENV_PREFIX: &str = "KEYSTONE";

/// Variable selecting the environment-specific config file.
pub const ENV_ENVIRONMENT: &str = "KEYSTONE_ENV";

/// Deployment variables kept for compatibility, with the key each overrides.
pub const LEGACY_OVERRIDES: [(&str, &str); 3] = [
    ("POSTGRES_CONNECTION_STRING", "database.url"),
    ("REDIS_URL", "redis.url"),
    ("PORT", "server.port"),
];

/// Loads the process configuration once at startup.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `KEYSTONE__` prefix
    /// 5. `POSTGRES_CONNECTION_STRING`, `REDIS_URL` and `PORT`
    pub fn new(config_dir: &str) -> Result<Self, KeystoneError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let config = load_config(config_dir, &std::env::vars().collect())?;
        info!("Configuration loaded from '{}'", config_dir);

        Ok(Self { config })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, KeystoneError> {
        Self::new("./config")
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    #[must_use]
    pub fn into_config(self) -> AppConfig {
        self.config
    }
}

/// Builds and validates the configuration from `config_dir` and a snapshot
/// of the process environment.
pub fn load_config(config_dir: &str, env: &Map<String, String>) -> Result<AppConfig, KeystoneError> {
    let environment = env
        .get(ENV_ENVIRONMENT)
        .cloned()
        .unwrap_or_else(|| "development".to_string());

    info!("Loading configuration for environment: {}", environment);

    let mut builder = Config::builder();

    for name in ["default", environment.as_str(), "local"] {
        let path = format!("{config_dir}/{name}.toml");
        if Path::new(&path).exists() {
            debug!("Loading config from: {}", path);
            builder = builder.add_source(File::with_name(&path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .source(Some(env.clone())),
    );

    for (var, key) in LEGACY_OVERRIDES {
        if let Some(value) = env.get(var).filter(|v| !v.is_empty()) {
            debug!("Overriding {} from {}", key, var);
            builder = builder
                .set_override(key, value.as_str())
                .map_err(config_error_to_keystone_error)?;
        }
    }

    let app_config: AppConfig = builder
        .build()
        .and_then(Config::try_deserialize)
        .map_err(config_error_to_keystone_error)?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validates the configuration, failing on the first report.
pub fn validate_config(config: &AppConfig) -> Result<(), KeystoneError> {
    if config.app.environment == "production" && !config.redis.enabled {
        warn!("Redis is disabled in production; every read will hit the database");
    }

    ConfigValidator::validate(config).map_err(|errors| {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        KeystoneError::Configuration(joined)
    })
}

fn config_error_to_keystone_error(err: ConfigError) -> KeystoneError {
    KeystoneError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn config_dir(default_toml: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("default.toml"), default_toml).unwrap();
        dir
    }

    #[test]
    fn test_defaults_without_files() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path().to_str().unwrap(), &env(&[])).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.ttl_secs, 604_800);
    }

    #[test]
    fn test_file_layers_in_order() {
        let dir = config_dir("[server]\nport = 9000\n\n[cache]\nttl_secs = 60\n");
        fs::write(dir.path().join("staging.toml"), "[server]\nport = 9100\n").unwrap();

        let path = dir.path().to_str().unwrap();
        let config = load_config(path, &env(&[(ENV_ENVIRONMENT, "staging")])).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.cache.ttl_secs, 60);

        let config = load_config(path, &env(&[])).unwrap();
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_prefixed_env_overrides_files() {
        let dir = config_dir("[redis]\nenabled = true\n");
        let config = load_config(
            dir.path().to_str().unwrap(),
            &env(&[("KEYSTONE__REDIS__ENABLED", "false"), ("KEYSTONE__CACHE__NAMESPACE", "people")]),
        )
        .unwrap();
        assert!(!config.redis.enabled);
        assert_eq!(config.cache.namespace, "people");
    }

    #[test]
    fn test_legacy_variables_override_everything() {
        let dir = config_dir("[server]\nport = 9000\n");
        let config = load_config(
            dir.path().to_str().unwrap(),
            &env(&[
                ("KEYSTONE__SERVER__PORT", "9200"),
                ("PORT", "3000"),
                ("POSTGRES_CONNECTION_STRING", "postgres://u:p@db:5432/users"),
                ("REDIS_URL", "redis://cache:6379"),
            ]),
        )
        .unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "postgres://u:p@db:5432/users");
        assert_eq!(config.redis.url, "redis://cache:6379");
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let dir = config_dir("[cache]\nttl_secs = 0\n");
        let err = load_config(dir.path().to_str().unwrap(), &env(&[])).unwrap_err();
        assert!(matches!(err, KeystoneError::Configuration(msg) if msg.contains("ttl")));
    }

    #[test]
    fn test_loader_get() {
        let dir = config_dir("[app]\nname = \"keystone-test\"\n");
        let loader = ConfigLoader::new(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(loader.get().app.name, "keystone-test");
        assert_eq!(loader.into_config().app.name, "keystone-test");
    }
}
