//! Configuration module
//!
//! This module organizes configuration into logical areas:
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//!
//! [`AppConfig::load`] layers built-in defaults, an optional per-environment
//! TOML file and `TOKEN_STORE__*` environment variables.

pub mod database;
pub mod environment;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};

/// Prefix for environment variable overrides, e.g. `TOKEN_STORE__DATABASE__URL`
pub const ENV_PREFIX: &str = "TOKEN_STORE";

/// Separator between nested keys in environment variable overrides
pub const ENV_SEPARATOR: &str = "__";

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            database: DatabaseConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig::new("mysql://localhost:3306/token_store_dev"),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig::new("mysql://prod-db:3306/token_store")
                .with_max_connections(50),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Preset configuration for an environment
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::development();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        }
    }

    /// Load configuration from plain environment variables
    ///
    /// Uses the preset for the detected environment, with the database
    /// settings taken from `DATABASE_*` variables when present.
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        let mut config = Self::for_environment(env);
        if std::env::var("DATABASE_URL").is_ok() {
            config.database = DatabaseConfig::from_env();
        }
        config
    }

    /// Load layered configuration
    ///
    /// Reads `.env` files first, then merges, lowest priority first:
    /// the [`from_env`](Self::from_env) result, `config.<env>.toml` if it
    /// exists, and `TOKEN_STORE__*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let env = Environment::from_env();
        dotenvy::from_filename(env.env_file()).ok();
        dotenvy::dotenv().ok();

        Self::load_from(Self::from_env())
    }

    /// Load layered configuration on top of explicit defaults
    pub fn load_from(defaults: Self) -> Result<Self, ConfigError> {
        let config_file = defaults.environment.config_file();

        let settings = ::config::Config::builder()
            .add_source(::config::Config::try_from(&defaults)?)
            .add_source(
                ::config::File::new(&config_file, ::config::FileFormat::Toml).required(false),
            )
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let dev = AppConfig::development();
        assert_eq!(dev.environment, Environment::Development);
        assert_eq!(dev.logging.format, LogFormat::Pretty);
        assert!(!dev.database.is_production());

        let prod = AppConfig::production();
        assert_eq!(prod.environment, Environment::Production);
        assert_eq!(prod.database.max_connections, 50);
        assert_eq!(prod.logging.format, LogFormat::Json);

        let staging = AppConfig::for_environment(Environment::Staging);
        assert_eq!(staging.environment, Environment::Staging);
        assert_eq!(staging.logging, LoggingConfig::for_environment(Environment::Staging));
    }

    #[test]
    fn test_load_from_keeps_defaults_without_overrides() {
        let mut defaults = AppConfig::for_environment(Environment::Staging);
        defaults.database = DatabaseConfig::new("mysql://config-test:3306/tokens")
            .with_max_connections(7);

        let loaded = AppConfig::load_from(defaults.clone()).unwrap();
        assert_eq!(loaded.database.url, defaults.database.url);
        assert_eq!(loaded.database.max_connections, 7);
        assert_eq!(loaded.logging, defaults.logging);
    }

    #[test]
    fn test_logging_section_is_optional() {
        let json = r#"{
            "environment": "production",
            "database": {
                "url": "mysql://db:3306/tokens",
                "max_connections": 20,
                "connect_timeout": 10
            }
        }"#;

        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.logging, LoggingConfig::default());
    }
}
