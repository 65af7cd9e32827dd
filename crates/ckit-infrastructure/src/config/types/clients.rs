//! Client configuration types

use ckit_domain::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use ckit_domain::value_objects::messaging::{
    DEFAULT_HEARTBEAT_SECS, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_INTERVAL_MS,
};
use ckit_domain::value_objects::{ConnectionOptions, RetryPolicy};
use ckit_providers::cache::RedisOptions;
use serde::{Deserialize, Serialize};

/// Message broker configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MqConfig {
    /// Log prefix of the client
    pub prefix: String,
    /// Broker host
    pub host: String,
    /// Broker port
    pub port: u16,
    /// User name
    pub username: String,
    /// Password
    pub password: String,
    /// Virtual host
    pub vhost: String,
    /// Heartbeat in seconds
    pub heartbeat: u16,
    /// Reconnect attempts before giving up
    pub max_retries: u32,
    /// Delay between reconnect attempts in milliseconds
    pub retry_interval_ms: u64,
}

impl Default for MqConfig {
    fn default() -> Self {
        let conn = ConnectionOptions::default();
        Self {
            prefix: "MQClient".to_string(),
            host: conn.host,
            port: conn.port,
            username: conn.username,
            password: conn.password,
            vhost: conn.vhost,
            heartbeat: DEFAULT_HEARTBEAT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_interval_ms: DEFAULT_RETRY_INTERVAL_MS,
        }
    }
}

impl MqConfig {
    /// Broker connection options
    pub fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            vhost: self.vhost.clone(),
            heartbeat: self.heartbeat,
        }
    }

    /// Reconnect policy
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            retry_interval_ms: self.retry_interval_ms,
        }
    }
}

/// Redis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Optional password
    pub password: Option<String>,
    /// Database index
    pub db: i64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        let opts = RedisOptions::default();
        Self {
            host: opts.host,
            port: opts.port,
            password: opts.password,
            db: opts.db,
        }
    }
}

impl From<&RedisConfig> for RedisOptions {
    fn from(config: &RedisConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            password: config.password.clone(),
            db: config.db,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Default request timeout in seconds
    pub timeout_secs: u64,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: format!("ckit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
