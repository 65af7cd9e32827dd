//! Application context
//!
//! Composition root of a ckit application: owns the configuration and the
//! error-code registry, and builds clients from their config sections.
//!
//! ```text
//! ConfigLoader → AppConfig → init_app → AppContext ─┬─ ErrorCodeRegistry
//!                                                   ├─ CustomValidator
//!                                                   ├─ JwtService / EasyTranslator
//!                                                   ├─ MqClient / HttpClient / RedisClient
//!                                                   └─ MongoClient / MailClient
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let context = AppContext::load()?;
//! let validator = context.validator();
//! validator.non_empty_string_throws(&body["name"], Some("ERR_NAME_IS_EMPTY"))?;
//!
//! let mq = context.amqp_mq_client();
//! mq.run_as_producer().await?;
//! ```

use crate::config::{AppConfig, ConfigLoader};
use crate::crypto::JwtService;
use crate::i18n::EasyTranslator;
use crate::validation::CustomValidator;
use ckit_domain::error::Result;
use ckit_domain::ports::BrokerConnector;
use ckit_domain::{CustomError, ErrorCodeRegistry, MessageArg};
use ckit_providers::http::{HttpClient, HttpOption};
use ckit_providers::messaging::MqClient;
use std::sync::Arc;
use tracing::info;

#[cfg(feature = "cache-redis")]
use ckit_providers::cache::{RedisClient, RedisOptions};
#[cfg(feature = "cache-redis")]
use ckit_providers::constants::REDIS_DEFAULT_PREFIX;
#[cfg(feature = "db-mongo")]
use ckit_providers::constants::MONGO_DEFAULT_PREFIX;
#[cfg(feature = "db-mongo")]
use ckit_providers::db::MongoClient;
#[cfg(feature = "mail-smtp")]
use ckit_providers::mail::MailClient;
#[cfg(feature = "mq-amqp")]
use ckit_providers::messaging::AmqpConnector;

const TRANSLATOR_PREFIX: &str = "[Translator]";

/// Configuration plus the shared error-code registry
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Application configuration
    pub config: Arc<AppConfig>,
    codes: Arc<ErrorCodeRegistry>,
}

impl AppContext {
    /// Load the configuration from the default sources and bootstrap
    pub fn load() -> Result<Self> {
        Self::load_with(&ConfigLoader::new())
    }

    /// Load the configuration through `loader` and bootstrap
    pub fn load_with(loader: &ConfigLoader) -> Result<Self> {
        init_app(loader.load()?)
    }

    /// Shared error-code registry
    pub fn codes(&self) -> Arc<ErrorCodeRegistry> {
        Arc::clone(&self.codes)
    }

    /// Build a registry-resolved error
    pub fn raise(&self, code_name: &str) -> CustomError {
        self.codes.raise(code_name)
    }

    /// Build a registry-resolved error with formatted message arguments
    pub fn raise_with_args(&self, code_name: &str, msg_args: Vec<MessageArg>) -> CustomError {
        self.codes.raise_with_args(code_name, msg_args).formatted()
    }

    /// Validator raising errors from this registry
    pub fn validator(&self) -> CustomValidator {
        CustomValidator::new(self.codes())
    }

    /// JWT service with the configured token lifetime
    pub fn jwt_service(&self) -> JwtService {
        JwtService::from_config(&self.config.jwt)
    }

    /// Translator loaded from the configured resources directory
    pub async fn translator(&self) -> Result<EasyTranslator> {
        let i18n = &self.config.i18n;
        let fallback = i18n.fallback_lang.as_deref().unwrap_or(&i18n.default_lang);
        let mut translator = EasyTranslator::new(TRANSLATOR_PREFIX).use_fallback_lng(fallback);
        if let Some(path) = &i18n.resources_path {
            translator = translator.use_resources(path.clone());
        }
        translator.initial().await
    }

    /// Broker client over `connector` using the `mq` section
    pub fn mq_client(&self, connector: Arc<dyn BrokerConnector>) -> MqClient {
        let mq = &self.config.mq;
        MqClient::new(
            mq.prefix.clone(),
            connector,
            mq.connection_options(),
            mq.retry_policy(),
        )
    }

    /// Broker client speaking AMQP 0-9-1
    #[cfg(feature = "mq-amqp")]
    pub fn amqp_mq_client(&self) -> MqClient {
        self.mq_client(Arc::new(AmqpConnector::new()))
    }

    /// HTTP client sending the configured user agent
    pub fn http_client(&self) -> Result<HttpClient> {
        HttpClient::with_user_agent(&self.config.http.user_agent)
    }

    /// Empty request option using the configured timeout
    pub fn http_option(&self) -> HttpOption {
        HttpOption::new().use_timeout_in_seconds(self.config.http.timeout_secs)
    }

    /// Redis client for the `redis` section, not yet connected
    #[cfg(feature = "cache-redis")]
    pub fn redis_client(&self) -> RedisClient {
        RedisClient::new(REDIS_DEFAULT_PREFIX, RedisOptions::from(&self.config.redis))
    }

    /// MongoDB client for the `mongo` section, not yet connected
    ///
    /// Fails when the connection string or database name is empty.
    #[cfg(feature = "db-mongo")]
    pub fn mongo_client(&self) -> Result<MongoClient> {
        MongoClient::new(MONGO_DEFAULT_PREFIX, self.config.mongo.clone())
    }

    /// Mail client with its SMTP pool built from the `mail` section
    #[cfg(feature = "mail-smtp")]
    pub fn mail_client(&self) -> Result<MailClient> {
        let client = MailClient::new();
        client.initial_smtp_pool(&self.config.mail)?;
        Ok(client)
    }
}

/// Build the application context
///
/// Registers `config.error_codes`; a duplicate code name fails the bootstrap.
pub fn init_app(config: AppConfig) -> Result<AppContext> {
    info!("Initializing application context");

    let codes = if config.error_codes.is_empty() {
        ErrorCodeRegistry::new()
    } else {
        ErrorCodeRegistry::from_codes(config.error_codes.clone())?
    };
    info!("Registered {} error codes", codes.len());

    Ok(AppContext {
        config: Arc::new(config),
        codes: Arc::new(codes),
    })
}
