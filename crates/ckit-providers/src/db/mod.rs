//! Database Clients
//!
//! | Client | Backend | Feature |
//! |--------|---------|---------|
//! | [`MongoClient`] | MongoDB | `db-mongo` |
//!
//! [`MongoOptions`] is always available so configuration can be loaded
//! without the client compiled in.

#[cfg(feature = "db-mongo")]
pub mod mongo;

#[cfg(feature = "db-mongo")]
pub use self::mongo::MongoClient;

use serde::{Deserialize, Serialize};

use crate::constants::{
    MONGO_DEFAULT_CONNECT_TIMEOUT_MS, MONGO_DEFAULT_MAX_POOL_SIZE, MONGO_DEFAULT_MIN_POOL_SIZE,
    MONGO_DEFAULT_URI,
};

/// MongoDB connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoOptions {
    /// Connection string
    pub uri: String,
    /// Database name
    pub db: String,
    /// Connections kept open in the pool
    pub min_pool_size: u32,
    /// Upper bound of the pool
    pub max_pool_size: u32,
    /// Connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// User name; credentials are sent only when it is set
    pub user: Option<String>,
    /// Password
    pub pass: Option<String>,
}

impl Default for MongoOptions {
    fn default() -> Self {
        Self {
            uri: MONGO_DEFAULT_URI.to_string(),
            db: String::new(),
            min_pool_size: MONGO_DEFAULT_MIN_POOL_SIZE,
            max_pool_size: MONGO_DEFAULT_MAX_POOL_SIZE,
            connect_timeout_ms: MONGO_DEFAULT_CONNECT_TIMEOUT_MS,
            user: None,
            pass: None,
        }
    }
}

impl MongoOptions {
    /// User name, unless unset or blank
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref().filter(|u| !u.trim().is_empty())
    }
}
