//! Cache Clients
//!
//! | Client | Backend | Feature |
//! |--------|---------|---------|
//! | [`RedisClient`] | Redis | `cache-redis` |
//!
//! [`RedisOptions`] is always available so configuration can be loaded
//! without the client compiled in.

#[cfg(feature = "cache-redis")]
pub mod redis;

#[cfg(feature = "cache-redis")]
pub use self::redis::RedisClient;

use serde::{Deserialize, Serialize};

use crate::constants::{REDIS_DEFAULT_HOST, REDIS_DEFAULT_PORT};

/// Redis connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisOptions {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Password, none for an open server
    pub password: Option<String>,
    /// Database index
    pub db: i64,
}

impl Default for RedisOptions {
    fn default() -> Self {
        Self {
            host: REDIS_DEFAULT_HOST.to_string(),
            port: REDIS_DEFAULT_PORT,
            password: None,
            db: 0,
        }
    }
}

impl RedisOptions {
    /// Display URL, `redis://[:***@]host:port/db`, with the password masked
    ///
    /// An empty password counts as none. Connections are opened from typed
    /// connection info, never from this string.
    pub fn url(&self) -> String {
        match self.password() {
            Some(_) => format!("redis://:***@{}:{}/{}", self.host, self.port, self.db),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }

    /// Password, unless unset or empty
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}
