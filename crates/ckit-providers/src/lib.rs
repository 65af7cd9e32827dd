//! # ckit Provider Implementations
//!
//! Vendor adapters behind the ckit clients. Broker connectors implement the
//! ports defined in `ckit-domain`.
//!
//! | Category | Client | Backends |
//! |----------|--------|----------|
//! | Messaging | [`messaging::MqClient`] | AMQP (lapin), in-memory |
//! | HTTP | [`http::HttpClient`] | reqwest |
//! | Cache | [`cache::RedisClient`] | Redis |
//! | Database | [`db::MongoClient`] | MongoDB |
//! | Mail | [`mail::MailClient`] | SMTP (lettre) |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! ckit-providers = { version = "0.1", default-features = false, features = ["mq-amqp"] }
//! ```

pub use ckit_domain::error::{Error, Result};
pub use ckit_domain::ports::{BrokerConnector, BrokerSession};

/// Provider-specific constants
pub mod constants;

/// Messaging client and broker connectors
pub mod messaging;

/// HTTP client producing result envelopes
pub mod http;

/// Redis client
pub mod cache;

/// MongoDB client
pub mod db;

/// SMTP mail client
pub mod mail;
