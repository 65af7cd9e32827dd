//! Configuration types module

pub mod app;
pub mod clients;
pub mod logging;
pub mod security;

pub use app::AppConfig;
pub use clients::{HttpConfig, MqConfig, RedisConfig};
pub use logging::LoggingConfig;
pub use security::{I18nConfig, JwtConfig};
