//! Result envelope

use crate::constants::SUCCESS_CODE;
use serde::{Deserialize, Serialize};

/// Uniform success/failure/value container
///
/// Built by value: every `with_*` call consumes the envelope and returns the
/// updated one.
///
/// ```
/// use ckit_domain::CustomResult;
///
/// let res = CustomResult::new().with_result("I am result");
/// assert!(res.is_ok());
/// assert_eq!(res.result, Some("I am result"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomResult<T> {
    /// For tracing
    pub trace_id: String,
    /// Error code, 0 means success
    pub code: i32,
    /// Error message
    pub message: String,
    /// Return value
    pub result: Option<T>,
}

impl<T> Default for CustomResult<T> {
    fn default() -> Self {
        Self {
            trace_id: String::new(),
            code: SUCCESS_CODE,
            message: String::new(),
            result: None,
        }
    }
}

impl<T> CustomResult<T> {
    /// An empty success envelope
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `code` is the success code
    pub fn is_ok(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Set the trace id
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    /// Set the code
    #[must_use]
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = code;
        self
    }

    /// Set the message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the result value
    #[must_use]
    pub fn with_result(mut self, result: T) -> Self {
        self.result = Some(result);
        self
    }

    /// Replace the result value, possibly with nothing
    #[must_use]
    pub fn with_optional_result(mut self, result: Option<T>) -> Self {
        self.result = result;
        self
    }

    /// Map the carried value, keeping code, message and trace id
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> CustomResult<U> {
        CustomResult {
            trace_id: self.trace_id,
            code: self.code,
            message: self.message,
            result: self.result.map(f),
        }
    }
}
