//! Configuration loader
//!
//! Sources are merged in order, later ones overriding earlier ones:
//! 1. `AppConfig::default()`
//! 2. a TOML file (explicit path, or the first default location found)
//! 3. environment variables such as `CKIT_MQ__HOST`

use crate::config::AppConfig;
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
    JWT_ALGORITHM,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};
use ckit_domain::ErrorCode;
use ckit_domain::error::{Error, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a loader with the default prefix and file discovery
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Load from this file instead of the default locations
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load and validate the configuration
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            let found = config_path.exists();
            if found {
                figment = figment.merge(Toml::file(config_path));
            }
            log_config_loaded(config_path, found);
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        figment = figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR),
        );

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;
        Ok(app_config)
    }

    /// Write `config` as TOML
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;
        std::fs::write(path.as_ref(), toml_string).io_context("Failed to write config file")?;
        Ok(())
    }

    /// Explicit configuration file path, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let mut candidates = vec![
            current_dir.join(DEFAULT_CONFIG_FILENAME),
            current_dir
                .join(DEFAULT_CONFIG_DIR)
                .join(DEFAULT_CONFIG_FILENAME),
        ];
        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(
                home.join(format!(".{DEFAULT_CONFIG_DIR}"))
                    .join(DEFAULT_CONFIG_FILENAME),
            );
        }

        candidates.into_iter().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate every configuration section
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    parse_log_level(&config.logging.level)?;
    validate_mq_config(config)?;
    validate_redis_config(config)?;
    validate_http_config(config)?;
    validate_jwt_config(config)?;
    validate_error_codes(&config.error_codes)?;
    Ok(())
}

fn validate_mq_config(config: &AppConfig) -> Result<()> {
    if config.mq.host.is_empty() {
        return Err(Error::configuration("MQ host cannot be empty"));
    }
    if config.mq.port == 0 {
        return Err(Error::configuration("MQ port cannot be 0"));
    }
    if config.mq.retry_interval_ms == 0 {
        return Err(Error::configuration("MQ retry interval cannot be 0"));
    }
    Ok(())
}

fn validate_redis_config(config: &AppConfig) -> Result<()> {
    if config.redis.port == 0 {
        return Err(Error::configuration("Redis port cannot be 0"));
    }
    if config.redis.db < 0 {
        return Err(Error::configuration("Redis database index cannot be negative"));
    }
    Ok(())
}

fn validate_http_config(config: &AppConfig) -> Result<()> {
    if config.http.timeout_secs == 0 {
        return Err(Error::configuration("HTTP timeout cannot be 0"));
    }
    Ok(())
}

fn validate_jwt_config(config: &AppConfig) -> Result<()> {
    if config.jwt.algorithm != JWT_ALGORITHM {
        return Err(Error::configuration(format!(
            "Unsupported JWT algorithm {}. Only {JWT_ALGORITHM} is supported",
            config.jwt.algorithm
        )));
    }
    Ok(())
}

fn validate_error_codes(codes: &[ErrorCode]) -> Result<()> {
    if let Some(code) = codes.iter().find(|c| c.code_name.is_empty()) {
        return Err(Error::configuration(format!(
            "Error code {} has an empty code name",
            code.code
        )));
    }
    Ok(())
}

/// Configuration builder for programmatic configuration
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    /// Start from the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set logging configuration
    pub fn with_logging(mut self, logging: crate::config::LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Set broker configuration
    pub fn with_mq(mut self, mq: crate::config::MqConfig) -> Self {
        self.config.mq = mq;
        self
    }

    /// Set Redis configuration
    pub fn with_redis(mut self, redis: crate::config::RedisConfig) -> Self {
        self.config.redis = redis;
        self
    }

    /// Set HTTP client configuration
    pub fn with_http(mut self, http: crate::config::HttpConfig) -> Self {
        self.config.http = http;
        self
    }

    /// Set JWT configuration
    pub fn with_jwt(mut self, jwt: crate::config::JwtConfig) -> Self {
        self.config.jwt = jwt;
        self
    }

    /// Set translator configuration
    pub fn with_i18n(mut self, i18n: crate::config::I18nConfig) -> Self {
        self.config.i18n = i18n;
        self
    }

    /// Append error codes to register at startup
    pub fn with_error_codes(mut self, codes: Vec<ErrorCode>) -> Self {
        self.config.error_codes.extend(codes);
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<AppConfig> {
        validate_app_config(&self.config)?;
        Ok(self.config)
    }
}
