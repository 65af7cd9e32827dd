//! MongoDB client
//!
//! The driver keeps its own pool and server monitors; this wrapper validates
//! the settings up front, pings on connect and hands out collections.
//!
//! ## Example
//!
//! ```ignore
//! use ckit_providers::db::{MongoClient, MongoOptions};
//!
//! let client = MongoClient::new("Orders", MongoOptions {
//!     uri: "mongodb://localhost:27017".into(),
//!     db: "shop".into(),
//!     ..MongoOptions::default()
//! })?;
//! let orders = client.get_collection_async::<Order>("orders").await?;
//! orders.insert_one(order).await?;
//! ```

use ckit_domain::error::{Error, Result};
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, Credential};
use mongodb::{Client, Collection, Database};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;
use tracing::{error, info};

use super::MongoOptions;

impl MongoOptions {
    /// Driver options: pool bounds, connect timeout and optional credentials
    pub async fn client_options(&self) -> mongodb::error::Result<ClientOptions> {
        let mut options = ClientOptions::parse(&self.uri).await?;
        options.min_pool_size = Some(self.min_pool_size);
        options.max_pool_size = Some(self.max_pool_size);
        options.connect_timeout = Some(Duration::from_millis(self.connect_timeout_ms));
        if let Some(user) = self.user() {
            let mut credential = Credential::default();
            credential.username = Some(user.to_string());
            credential.password = self.pass.clone();
            options.credential = Some(credential);
        }
        Ok(options)
    }
}

/// MongoDB client bound to one database
pub struct MongoClient {
    prefix: String,
    options: MongoOptions,
    db: RwLock<Option<Database>>,
    connected: AtomicBool,
    attempts: AtomicU32,
}

impl MongoClient {
    /// Validate the settings; nothing connects until [`MongoClient::try_connect`]
    pub fn new(prefix: impl Into<String>, options: MongoOptions) -> Result<Self> {
        let prefix = prefix.into();
        if options.uri.trim().is_empty() {
            return Err(Error::invalid_argument(format!("[{prefix}] uri is empty")));
        }
        if options.db.trim().is_empty() {
            return Err(Error::invalid_argument(format!("[{prefix}] db name is empty")));
        }
        Ok(Self {
            prefix,
            options,
            db: RwLock::new(None),
            connected: AtomicBool::new(false),
            attempts: AtomicU32::new(0),
        })
    }

    /// Connection settings
    pub fn options(&self) -> &MongoOptions {
        &self.options
    }

    /// Build the driver client and ping the database
    pub async fn try_connect(&self) -> Result<()> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        info!(client = %self.prefix, "Try connecting for {attempt} times");

        let options = self
            .options
            .client_options()
            .await
            .map_err(|e| self.failure("Invalid options", e))?;
        let client = Client::with_options(options).map_err(|e| self.failure("Invalid options", e))?;
        let db = client.database(&self.options.db);
        if let Err(e) = db.run_command(doc! { "ping": 1 }).await {
            error!(client = %self.prefix, "Database {} error: {e}", self.options.db);
            self.connected.store(false, Ordering::SeqCst);
            return Err(self.failure("Failed to connect", e));
        }

        let mut slot = self
            .db
            .write()
            .map_err(|_| Error::internal("Mongo client lock poisoned"))?;
        *slot = Some(db);
        self.connected.store(true, Ordering::SeqCst);
        self.attempts.store(0, Ordering::SeqCst);
        info!(client = %self.prefix, "{} opened...", self.options.db);
        Ok(())
    }

    /// Whether the last connect or ping succeeded
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Round-trip a ping, updating the connection state
    pub async fn ping(&self) -> Result<()> {
        let db = self.database()?;
        match db.run_command(doc! { "ping": 1 }).await {
            Ok(_) => {
                self.connected.store(true, Ordering::SeqCst);
                Ok(())
            }
            Err(e) => {
                self.connected.store(false, Ordering::SeqCst);
                error!(client = %self.prefix, "Database {} error: {e}", self.options.db);
                Err(self.failure("Ping failed", e))
            }
        }
    }

    /// Collection of the connected database
    pub fn get_collection<T: Send + Sync>(&self, name: &str) -> Result<Collection<T>> {
        Ok(self.database()?.collection::<T>(name))
    }

    /// Collection of the database, connecting first when disconnected
    pub async fn get_collection_async<T: Send + Sync>(&self, name: &str) -> Result<Collection<T>> {
        if !(self.is_connected() && self.database().is_ok()) {
            self.try_connect().await?;
        }
        self.get_collection(name)
    }

    /// Forget the database handle
    pub fn close(&self) {
        info!(client = %self.prefix, "Database {} closing...", self.options.db);
        if let Ok(mut slot) = self.db.write() {
            slot.take();
        }
        self.connected.store(false, Ordering::SeqCst);
    }

    fn database(&self) -> Result<Database> {
        self.db
            .read()
            .ok()
            .and_then(|slot| slot.clone())
            .ok_or_else(|| Error::invalid_state(format!("[{}] DB is undefined", self.prefix)))
    }

    fn failure(&self, action: &str, e: mongodb::error::Error) -> Error {
        Error::database_with_source(format!("[{}] {action}: {e}", self.prefix), e)
    }
}

impl std::fmt::Debug for MongoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoClient")
            .field("prefix", &self.prefix)
            .field("db", &self.options.db)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}
