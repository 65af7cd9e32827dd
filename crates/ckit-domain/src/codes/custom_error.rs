//! Registry-resolved application error

use crate::constants::{OTHER_ERROR_CODE, SUCCESS_CODE};
use crate::error::Error;
use crate::value_objects::CustomResult;
use serde::Serialize;
use thiserror::Error as ThisError;

use super::format::{MessageArg, format_message};
use super::registry::ErrorCodeRegistry;

/// An application error whose fields come from an [`ErrorCodeRegistry`]
///
/// The fields are resolved when the error is built. Message arguments are
/// only substituted into the template when [`CustomError::format`] is called.
#[derive(Debug, Clone, PartialEq, ThisError, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct CustomError {
    /// Numeric code
    pub code: i32,
    /// Symbolic code name
    pub code_name: String,
    /// HTTP status
    pub http_status: u16,
    /// Message, a template until formatted
    pub message: String,
    /// Positional message arguments
    #[serde(skip)]
    pub msg_args: Vec<MessageArg>,
}

impl CustomError {
    /// Resolve `code_name` against `registry`
    pub fn new(registry: &ErrorCodeRegistry, code_name: &str) -> Self {
        Self::with_args(registry, code_name, Vec::new())
    }

    /// Resolve `code_name` against `registry`, keeping `msg_args` for [`Self::format`]
    pub fn with_args(
        registry: &ErrorCodeRegistry,
        code_name: &str,
        msg_args: Vec<MessageArg>,
    ) -> Self {
        let code = registry.get_code(code_name);
        Self {
            code: code.code,
            code_name: code.code_name,
            http_status: code.http_status,
            message: code.message,
            msg_args,
        }
    }

    /// An `ERR_OTHERS` error carrying `message`
    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        let mut err = Self::new(&ErrorCodeRegistry::new(), "");
        if !message.is_empty() {
            err.message = message;
        }
        err
    }

    /// Convert any domain error into a [`CustomError`]
    ///
    /// Coded errors are returned unchanged. Everything else becomes
    /// `ERR_OTHERS` with the original message.
    pub fn from_error(error: Error) -> Self {
        match error {
            Error::Coded(err) => err,
            other => Self::other(other.detail()),
        }
    }

    /// Convert an arbitrary error reference into a [`CustomError`]
    pub fn from_dyn(error: &(dyn std::error::Error + 'static)) -> Self {
        if let Some(err) = error.downcast_ref::<Self>() {
            return err.clone();
        }
        if let Some(err) = error.downcast_ref::<Error>() {
            return match err {
                Error::Coded(inner) => inner.clone(),
                other => Self::other(other.detail()),
            };
        }
        Self::other(error.to_string())
    }

    /// Whether the code means success
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Whether the code is the `ERR_OTHERS` fallback
    pub fn is_exception(&self) -> bool {
        self.code == OTHER_ERROR_CODE
    }

    /// Substitute the message arguments into the message in place
    ///
    /// Does nothing when no arguments were supplied.
    pub fn format(&mut self) {
        if !self.msg_args.is_empty() {
            self.message = format_message(&self.message, &self.msg_args);
        }
    }

    /// Consume and return the formatted error
    #[must_use]
    pub fn formatted(mut self) -> Self {
        self.format();
        self
    }

    /// Replace the message arguments
    #[must_use]
    pub fn with_msg_args(mut self, msg_args: Vec<MessageArg>) -> Self {
        self.msg_args = msg_args;
        self
    }

    /// Render this error as a result envelope
    pub fn to_result<T>(&self) -> CustomResult<T> {
        CustomResult::new()
            .with_code(self.code)
            .with_message(self.message.clone())
    }
}

impl From<Error> for CustomError {
    fn from(error: Error) -> Self {
        Self::from_error(error)
    }
}
