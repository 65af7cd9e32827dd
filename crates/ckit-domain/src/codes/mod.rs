//! Error codes
//!
//! Application-defined error codes live in an [`ErrorCodeRegistry`] that the
//! hosting application fills once at startup and shares through its context.
//! A [`CustomError`] resolves its code, HTTP status and message template from
//! the registry when it is constructed.

mod custom_error;
mod format;
mod registry;

pub use custom_error::CustomError;
pub use format::{MessageArg, format_message};
pub use registry::{ErrorCode, ErrorCodeRegistry};
