//! # ckit Infrastructure Layer
//!
//! Cross-cutting technical concerns shared by every ckit client.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-based configuration loading and validation |
//! | [`logging`] | tracing-subscriber initialization |
//! | [`error_ext`] | Context extension for foreign errors |
//! | [`timer`] | Timeout race producing result envelopes |
//! | [`crypto`] | RS256 JSON Web Tokens |
//! | [`validation`] | Rule-based value validation raising coded errors |
//! | [`i18n`] | JSON-dictionary translator |
//! | [`utils`] | Base64, random values, locale negotiation, chunking |
//! | [`context`] | Application context owning config and error codes |

pub mod config;
pub mod constants;
pub mod context;
pub mod crypto;
pub mod error_ext;
pub mod i18n;
pub mod logging;
pub mod timer;
pub mod utils;
pub mod validation;

pub use context::{AppContext, init_app};
pub use error_ext::ErrorContext;
pub use timer::TimeoutTimer;
