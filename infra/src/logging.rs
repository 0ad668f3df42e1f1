//! Tracing subscriber setup
//!
//! Installs a global `tracing` subscriber from [`LoggingConfig`]. `RUST_LOG`
//! takes precedence over the configured level. Records emitted through the
//! `log` crate (SQLx statement logging) are forwarded into `tracing`.

use tracing::Subscriber;
use tracing_subscriber::{fmt, prelude::*, registry::LookupSpan, EnvFilter, Layer};

use crate::config::{LogFormat, LoggingConfig};
use crate::InfrastructureError;

/// Initialize the global tracing subscriber
///
/// # Errors
/// * `InfrastructureError::Logging` - Invalid level directive, or a global
///   subscriber is already installed
pub fn init_tracing(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.level)?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(config))
        .try_init()
        .map_err(|e| InfrastructureError::Logging(e.to_string()))
}

/// Parse a level or filter directive such as `info` or `info,ts_infra=debug`
pub fn build_filter(level: &str) -> Result<EnvFilter, InfrastructureError> {
    EnvFilter::try_new(level).map_err(|e| {
        InfrastructureError::Logging(format!("Invalid log filter '{}': {}", level, e))
    })
}

fn fmt_layer<S>(config: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    let layer = fmt::layer()
        .with_ansi(config.colored)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_target(true);

    match (config.format, config.timestamp) {
        (LogFormat::Json, true) => layer.json().boxed(),
        (LogFormat::Json, false) => layer.json().without_time().boxed(),
        (LogFormat::Pretty, true) => layer.pretty().boxed(),
        (LogFormat::Pretty, false) => layer.pretty().without_time().boxed(),
        (LogFormat::Compact, true) => layer.compact().boxed(),
        (LogFormat::Compact, false) => layer.compact().without_time().boxed(),
    }
}
