//! Main application configuration

use ckit_domain::ErrorCode;
use ckit_providers::db::MongoOptions;
use ckit_providers::mail::SmtpOptions;
use serde::{Deserialize, Serialize};

use super::clients::{HttpConfig, MqConfig, RedisConfig};
use super::logging::LoggingConfig;
use super::security::{I18nConfig, JwtConfig};

/// Root configuration
///
/// Every section falls back to its defaults, so an empty file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging
    pub logging: LoggingConfig,
    /// Message broker
    pub mq: MqConfig,
    /// Redis
    pub redis: RedisConfig,
    /// MongoDB
    pub mongo: MongoOptions,
    /// SMTP mail server
    pub mail: SmtpOptions,
    /// HTTP client
    pub http: HttpConfig,
    /// JSON Web Tokens
    pub jwt: JwtConfig,
    /// Translator
    pub i18n: I18nConfig,
    /// Error codes registered at startup
    pub error_codes: Vec<ErrorCode>,
}
