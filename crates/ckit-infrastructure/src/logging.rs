//! Structured logging with tracing
//!
//! Every ckit client logs through `tracing` with its log prefix in a
//! `client` field. Applications call [`init_logging`] once at startup;
//! the `CKIT_LOG` environment variable overrides the configured filter.

use ckit_domain::error::{Error, Result};
use std::path::Path;

pub use crate::config::LoggingConfig;
use crate::constants::{DEFAULT_LOG_FILE_STEM, LOG_FILTER_ENV};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber
///
/// Fails when the level is unknown or a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_appender = config.file_output.as_ref().map(|path| {
        tracing_appender::rolling::daily(
            path.parent().unwrap_or_else(|| Path::new(".")),
            path.file_stem()
                .unwrap_or_else(|| std::ffi::OsStr::new(DEFAULT_LOG_FILE_STEM)),
        )
    });

    // json and text layers have different types, hence the four branches
    let registry = Registry::default().with(filter);
    let installed = match (config.json_format, file_appender) {
        (true, Some(appender)) => registry
            .with(fmt::layer().json().with_target(true))
            .with(fmt::layer().json().with_writer(appender).with_ansi(false))
            .try_init(),
        (true, None) => registry
            .with(fmt::layer().json().with_target(true))
            .try_init(),
        (false, Some(appender)) => registry
            .with(fmt::layer().with_target(true))
            .with(fmt::layer().with_writer(appender).with_ansi(false))
            .try_init(),
        (false, None) => registry.with(fmt::layer().with_target(true)).try_init(),
    };
    installed.map_err(|e| Error::configuration_with_source("Failed to install logger", e))?;

    info!("Logging initialized with level: {}", level);
    Ok(())
}

/// Parse a log level name
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::configuration(format!(
            "Invalid log level: {level}. Use trace, debug, info, warn, or error"
        ))),
    }
}

/// Log configuration loading status
pub fn log_config_loaded(config_path: &Path, success: bool) {
    if success {
        info!("Configuration loaded from {}", config_path.display());
    } else {
        warn!("Configuration file not found: {}", config_path.display());
    }
}
