//! Database configuration module

use serde::{Deserialize, Serialize};

/// Database configuration for the MySQL token store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout: u64,

    /// Idle connection timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,

    /// Maximum lifetime of a connection in seconds
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime: u64,

    /// Enable SQL statement logging
    #[serde(default)]
    pub enable_logging: bool,

    /// Slow query threshold in milliseconds
    #[serde(default = "default_slow_query_threshold")]
    pub slow_query_threshold: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::from("mysql://localhost:3306/token_store"),
            max_connections: 10,
            connect_timeout: 30,
            idle_timeout: default_idle_timeout(),
            max_lifetime: default_max_lifetime(),
            enable_logging: false,
            slow_query_threshold: default_slow_query_threshold(),
        }
    }
}

impl DatabaseConfig {
    /// Create from environment variables
    ///
    /// Reads `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS` and
    /// `DATABASE_CONNECT_TIMEOUT`; anything missing or unparsable falls
    /// back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let url = std::env::var("DATABASE_URL").unwrap_or(defaults.url);
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_connections);
        let connect_timeout = std::env::var("DATABASE_CONNECT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.connect_timeout);

        Self {
            url,
            max_connections,
            connect_timeout,
            ..defaults
        }
    }

    /// Create a new database configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the maximum number of connections
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the connection timeout in seconds
    pub fn with_connect_timeout(mut self, seconds: u64) -> Self {
        self.connect_timeout = seconds;
        self
    }

    /// Enable SQL statement logging
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    /// Check if this is a production database
    pub fn is_production(&self) -> bool {
        !self.url.contains("localhost") && !self.url.contains("127.0.0.1")
    }
}

fn default_idle_timeout() -> u64 {
    600 // 10 minutes
}

fn default_max_lifetime() -> u64 {
    1800 // 30 minutes
}

fn default_slow_query_threshold() -> u64 {
    1000 // 1 second
}
