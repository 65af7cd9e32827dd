//! # ckit
//!
//! A custom kit for services: a uniform result envelope, an injectable
//! error-code registry, a timeout race, and thin clients for message brokers,
//! HTTP, Redis, MongoDB and SMTP that log with one prefix per client.
//!
//! ## Example
//!
//! ```ignore
//! use ckit::{AppContext, CustomResult};
//! use ckit::providers::messaging::message_handler;
//!
//! let context = AppContext::load()?;
//! let mq = context.amqp_mq_client();
//! mq.run_as_consumer().await?;
//! mq.prefetch(10, false).await?;
//! mq.consume_from_queue("orders", message_handler(|delivery, body| async move {
//!     tracing::info!(%body, "order received");
//!     Ok(())
//! }), None).await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - envelope, error codes, domain errors, broker ports
//! - `infrastructure` - config, logging, context, timer, JWT, validator, translator, utils
//! - `providers` - broker client and connectors, HTTP, Redis, MongoDB and mail clients

/// Domain layer - envelope, error codes and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use ckit_domain::*;
}

/// Infrastructure layer - config, context and helpers
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use ckit_infrastructure::*;
}

/// Providers - client implementations
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use ckit_providers::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::{CustomError, CustomResult, Error, ErrorCode, ErrorCodeRegistry, Result};

// Re-export the composition root and helpers
pub use infrastructure::{AppContext, TimeoutTimer, init_app};

// Re-export the clients
pub use providers::http::{HttpClient, HttpOption, HttpReply};
pub use providers::messaging::MqClient;

#[cfg(feature = "cache-redis")]
pub use providers::cache::RedisClient;

#[cfg(feature = "db-mongo")]
pub use providers::db::MongoClient;

#[cfg(feature = "mail-smtp")]
pub use providers::mail::MailClient;
