//! # ckit Domain Layer
//!
//! Pure types shared by every other ckit crate.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Domain `Error` enum and `Result` alias |
//! | [`codes`] | Error-code registry and registry-resolved [`CustomError`] |
//! | [`value_objects`] | Result envelope and messaging value objects |
//! | [`ports`] | Broker connector/session contracts |
//! | [`constants`] | Reserved codes and library defaults |

pub mod codes;
pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use codes::{CustomError, ErrorCode, ErrorCodeRegistry, MessageArg};
pub use error::{Error, Result};
pub use value_objects::CustomResult;
