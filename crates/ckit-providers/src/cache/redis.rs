//! Redis client
//!
//! Wraps a [`ConnectionManager`], which reconnects on its own, and adds JSON
//! helpers on top.
//!
//! ## Example
//!
//! ```ignore
//! use ckit_providers::cache::{RedisClient, RedisOptions};
//!
//! let client = RedisClient::new("Sessions", RedisOptions::default());
//! client.create().await?;
//! client.set_json("user:1", &user, Some(Duration::from_secs(60))).await?;
//! let user: Option<User> = client.get_json("user:1").await?;
//! ```

use ::redis::aio::ConnectionManager;
use ::redis::{
    AsyncCommands, Client, ConnectionAddr, ConnectionInfo, IntoConnectionInfo,
    RedisConnectionInfo, RedisError,
};
use ckit_domain::error::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{error, info};

use super::RedisOptions;

/// Redis client with a lazily created managed connection
pub struct RedisClient {
    prefix: String,
    options: RedisOptions,
    manager: RwLock<Option<ConnectionManager>>,
    connected: AtomicBool,
}

impl RedisClient {
    /// Create a client; nothing connects until [`RedisClient::create`]
    pub fn new(prefix: impl Into<String>, options: RedisOptions) -> Self {
        Self {
            prefix: prefix.into(),
            options,
            manager: RwLock::new(None),
            connected: AtomicBool::new(false),
        }
    }

    /// Connection settings
    pub fn options(&self) -> &RedisOptions {
        &self.options
    }

    /// Open the managed connection
    pub async fn create(&self) -> Result<()> {
        let info = self
            .options
            .connection_info()
            .map_err(|e| self.failure("Invalid options", e))?;
        let client = Client::open(info).map_err(|e| self.failure("Invalid options", e))?;
        let manager = client.get_connection_manager().await.map_err(|e| {
            error!(client = %self.prefix, "{e}");
            self.failure("Failed to connect", e)
        })?;

        let mut slot = self
            .manager
            .write()
            .map_err(|_| Error::internal("Redis client lock poisoned"))?;
        *slot = Some(manager);
        self.connected.store(true, Ordering::SeqCst);
        info!(
            client = %self.prefix,
            "Db client connected to {}:{}", self.options.host, self.options.port
        );
        Ok(())
    }

    /// Whether the last interaction with the server succeeded
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// The managed connection
    pub fn instance(&self) -> Result<ConnectionManager> {
        self.manager
            .read()
            .ok()
            .and_then(|slot| slot.clone())
            .ok_or_else(|| {
                Error::invalid_state(format!("[{}] Redis instance not init", self.prefix))
            })
    }

    /// Round-trip a PING
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.instance()?;
        let reply: String =
            self.track(::redis::cmd("PING").query_async(&mut conn).await, "PING")?;
        if reply == "PONG" {
            Ok(())
        } else {
            Err(Error::database(format!("Unexpected PING reply: {reply}")))
        }
    }

    /// Read and decode a JSON value
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.instance()?;
        let raw: Option<String> = self.track(conn.get(key).await, "GET")?;
        raw.map(|text| serde_json::from_str(&text).map_err(Error::from))
            .transpose()
    }

    /// Encode and store a JSON value, expiring after `ttl` when given
    pub async fn set_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let mut conn = self.instance()?;
        let text = serde_json::to_string(value)?;
        match ttl.map(|t| t.as_secs()).filter(|secs| *secs > 0) {
            Some(secs) => self.track(conn.set_ex(key, text, secs).await, "SETEX"),
            None => self.track(conn.set(key, text).await, "SET"),
        }
    }

    /// Delete a key, returning whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.instance()?;
        let removed: i64 = self.track(conn.del(key).await, "DEL")?;
        Ok(removed > 0)
    }

    /// Whether a key exists
    pub async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.instance()?;
        self.track(conn.exists(key).await, "EXISTS")
    }

    /// Drop the connection
    pub fn close(&self) {
        if let Ok(mut slot) = self.manager.write()
            && slot.take().is_some()
        {
            info!(client = %self.prefix, "Db client close");
        }
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Record the connection state implied by a command result
    fn track<T>(&self, result: ::redis::RedisResult<T>, command: &str) -> Result<T> {
        match result {
            Ok(value) => {
                self.connected.store(true, Ordering::SeqCst);
                Ok(value)
            }
            Err(e) => {
                if e.is_io_error() || e.is_connection_dropped() {
                    self.connected.store(false, Ordering::SeqCst);
                }
                error!(client = %self.prefix, "{command} failed: {e}");
                Err(self.failure(&format!("Redis {command} failed"), e))
            }
        }
    }

    fn failure(&self, action: &str, e: RedisError) -> Error {
        Error::database_with_source(format!("[{}] {action}: {e}", self.prefix), e)
    }
}

impl RedisOptions {
    /// Typed connection info; the password is passed through untouched
    pub fn connection_info(&self) -> ::redis::RedisResult<ConnectionInfo> {
        let mut settings = RedisConnectionInfo::default().set_db(self.db);
        if let Some(password) = self.password() {
            settings = settings.set_password(password);
        }
        Ok(ConnectionAddr::Tcp(self.host.clone(), self.port)
            .into_connection_info()?
            .set_redis_settings(settings))
    }
}

impl std::fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisClient")
            .field("prefix", &self.prefix)
            .field("host", &self.options.host)
            .field("port", &self.options.port)
            .field("db", &self.options.db)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}
