//! Deployment environment and log output settings
//!
//! The environment picks which `config.<env>.toml` and `.env.<env>` files
//! [`AppConfig::load`](super::AppConfig::load) reads, and the logging preset
//! the token store starts with.

use serde::{Deserialize, Serialize};
use std::env;

/// Variables checked, in order, to detect the environment
const ENVIRONMENT_VARS: [&str; 2] = ["TOKEN_STORE_ENV", "ENVIRONMENT"];

/// Deployment environment of the token store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Detect the environment from `TOKEN_STORE_ENV`, then `ENVIRONMENT`
    ///
    /// Missing or unrecognised values fall back to development.
    pub fn from_env() -> Self {
        ENVIRONMENT_VARS
            .iter()
            .find_map(|name| env::var(name).ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Optional TOML overlay for this environment
    pub fn config_file(&self) -> String {
        format!("config.{}.toml", self.as_str())
    }

    /// Optional dotenv file for this environment
    pub fn env_file(&self) -> String {
        format!(".env.{}", self.as_str())
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("Unknown environment '{}'", other)),
        }
    }
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    #[default]
    Compact,
}

/// Tracing subscriber settings
///
/// Every field may be omitted from configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `warn,ts_infra=debug`
    pub level: String,
    pub format: LogFormat,
    /// ANSI colours, ignored by the JSON format
    pub colored: bool,
    pub timestamp: bool,
    /// Emit file and line of each event
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: LogFormat::default(),
            colored: true,
            timestamp: true,
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Logging preset for an environment
    ///
    /// Development traces every store operation and SQL statement. Staging
    /// and production emit JSON; production keeps store errors and pool
    /// lifecycle events only.
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                level: String::from("debug,sqlx=info"),
                format: LogFormat::Pretty,
                source_location: true,
                ..Self::default()
            },
            Environment::Staging => Self {
                level: String::from("info,ts_core=debug,sqlx=warn"),
                format: LogFormat::Json,
                colored: false,
                ..Self::default()
            },
            Environment::Production => Self {
                level: String::from("warn,ts_infra=info"),
                format: LogFormat::Json,
                colored: false,
                ..Self::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!("dev".parse::<Environment>(), Ok(Environment::Development));
        assert_eq!(" Test ".parse::<Environment>(), Ok(Environment::Staging));
        assert_eq!("PROD".parse::<Environment>(), Ok(Environment::Production));

        let err = "qa".parse::<Environment>().unwrap_err();
        assert!(err.contains("qa"));
    }

    #[test]
    fn test_environment_file_names() {
        let staging = Environment::Staging;
        assert_eq!(staging.to_string(), "staging");
        assert_eq!(staging.config_file(), "config.staging.toml");
        assert_eq!(Environment::Production.env_file(), ".env.production");
        assert_eq!(Environment::default(), Environment::Development);
    }

    #[test]
    fn test_logging_presets() {
        let dev = LoggingConfig::for_environment(Environment::Development);
        assert_eq!(dev.format, LogFormat::Pretty);
        assert!(dev.colored && dev.source_location);
        assert!(dev.level.starts_with("debug"));

        let prod = LoggingConfig::for_environment(Environment::Production);
        assert_eq!(prod.format, LogFormat::Json);
        assert!(!prod.colored && !prod.source_location);
        assert!(prod.level.starts_with("warn"));
    }

    #[test]
    fn test_logging_fields_default_individually() {
        let config: LoggingConfig = serde_json::from_str(r#"{ "format": "json" }"#).unwrap();

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "info");
        assert!(config.timestamp);
    }
}
