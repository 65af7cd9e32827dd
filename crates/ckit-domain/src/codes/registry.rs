//! Error-code registry

use crate::constants::{
    INTERNAL_SERVER_ERROR_STATUS, OTHER_ERROR_CODE, OTHER_ERROR_CODE_NAME, OTHER_ERROR_MSG,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use super::custom_error::CustomError;
use super::format::MessageArg;

/// A registered application error code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorCode {
    /// Unique symbolic name (e.g. `ERR_NAME_IS_EMPTY`)
    pub code_name: String,
    /// Numeric code, `0` means success
    pub code: i32,
    /// HTTP status reported for this code
    pub http_status: u16,
    /// Message template, may contain `%s`/`%i` placeholders
    pub message: String,
}

impl ErrorCode {
    /// Create a new error code
    pub fn new(
        code_name: impl Into<String>,
        code: i32,
        http_status: u16,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code_name: code_name.into(),
            code,
            http_status,
            message: message.into(),
        }
    }

    /// The synthesized entry returned for unregistered names
    ///
    /// The message is the requested name, or the generic exception message
    /// when the name is empty.
    pub fn other(requested_name: &str) -> Self {
        let message = if requested_name.is_empty() {
            OTHER_ERROR_MSG
        } else {
            requested_name
        };
        Self::new(
            OTHER_ERROR_CODE_NAME,
            OTHER_ERROR_CODE,
            INTERNAL_SERVER_ERROR_STATUS,
            message,
        )
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    order: Vec<String>,
    codes: HashMap<String, ErrorCode>,
}

/// Registry mapping code names to [`ErrorCode`] entries
///
/// Shared by reference (`Arc<ErrorCodeRegistry>`) through the application
/// context. Names are unique; lookups of unknown names fall back to the
/// `ERR_OTHERS` entry.
#[derive(Debug, Default)]
pub struct ErrorCodeRegistry {
    inner: RwLock<RegistryInner>,
}

impl ErrorCodeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-filled with `codes`
    pub fn from_codes(codes: Vec<ErrorCode>) -> Result<Self> {
        let registry = Self::new();
        registry.add_codes(codes)?;
        Ok(registry)
    }

    /// Add error codes
    ///
    /// Fails on an empty input and on the first name that is already
    /// registered. Entries preceding the duplicate stay registered.
    pub fn add_codes(&self, codes: Vec<ErrorCode>) -> Result<()> {
        if codes.is_empty() {
            return Err(Error::invalid_argument("Cannot added with an empty array"));
        }
        let mut inner = self
            .inner
            .write()
            .map_err(|_| Error::internal("Error code registry lock poisoned"))?;
        for code in codes {
            if inner.codes.contains_key(&code.code_name) {
                return Err(Error::invalid_argument(format!(
                    "Duplicate code name {} was founded",
                    code.code_name
                )));
            }
            inner.order.push(code.code_name.clone());
            inner.codes.insert(code.code_name.clone(), code);
        }
        Ok(())
    }

    /// Get a single error code by name, or the `ERR_OTHERS` fallback
    pub fn get_code(&self, code_name: &str) -> ErrorCode {
        self.inner
            .read()
            .ok()
            .and_then(|inner| inner.codes.get(code_name).cloned())
            .unwrap_or_else(|| ErrorCode::other(code_name))
    }

    /// All registered codes in insertion order
    pub fn get_codes(&self) -> Vec<ErrorCode> {
        match self.inner.read() {
            Ok(inner) => inner
                .order
                .iter()
                .filter_map(|name| inner.codes.get(name).cloned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Whether `code_name` is registered
    pub fn contains(&self, code_name: &str) -> bool {
        self.inner
            .read()
            .map(|inner| inner.codes.contains_key(code_name))
            .unwrap_or(false)
    }

    /// Number of registered codes
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.order.len()).unwrap_or(0)
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every registered code
    ///
    /// Intended for test isolation only.
    pub fn clear_all_codes(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.order.clear();
            inner.codes.clear();
        }
    }

    /// Build a [`CustomError`] for `code_name`
    pub fn raise(&self, code_name: &str) -> CustomError {
        CustomError::new(self, code_name)
    }

    /// Build a [`CustomError`] for `code_name` with message arguments
    pub fn raise_with_args(&self, code_name: &str, msg_args: Vec<MessageArg>) -> CustomError {
        CustomError::with_args(self, code_name, msg_args)
    }
}
