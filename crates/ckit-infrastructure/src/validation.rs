//! Rule-based validation
//!
//! Failed checks raise a [`CustomError`](ckit_domain::CustomError) resolved
//! from the registry, using the rule message as the code name.

use ckit_domain::error::{Error, Result};
use ckit_domain::ErrorCodeRegistry;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, LazyLock};

const EMAIL_REGEX: &str = r"^[\w\-.]+@([\w-]+\.)+[\w-]{2,4}$";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_REGEX).expect("Invalid regex"));

/// Built-in checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidateStrategy {
    /// A string with at least one non-whitespace character
    NonEmptyString,
    /// An array with at least one element
    NonEmptyArray,
    /// An e-mail address
    IsEmail,
    /// A JSON number
    IsNumber,
}

impl ValidateStrategy {
    fn check(self, value: &Value) -> bool {
        match self {
            Self::NonEmptyString => non_empty_string(value),
            Self::NonEmptyArray => non_empty_array(value),
            Self::IsEmail => is_email(value),
            Self::IsNumber => is_number(value),
        }
    }
}

/// Custom check function
pub type ValidateFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// What a rule checks
#[derive(Clone)]
pub enum RuleCheck {
    /// A built-in strategy
    Strategy(ValidateStrategy),
    /// A caller-supplied predicate
    Custom(ValidateFn),
}

impl fmt::Debug for RuleCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strategy(s) => f.debug_tuple("Strategy").field(s).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

/// A check and the code name raised when it fails
#[derive(Debug, Clone)]
pub struct ValidateRule {
    /// Code name raised on failure
    pub message: String,
    /// The check
    pub check: RuleCheck,
}

impl ValidateRule {
    /// Rule using a built-in strategy
    pub fn strategy(strategy: ValidateStrategy, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            check: RuleCheck::Strategy(strategy),
        }
    }

    /// Rule using a custom predicate
    pub fn custom<F>(func: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            check: RuleCheck::Custom(Arc::new(func)),
        }
    }

    fn passes(&self, value: &Value) -> bool {
        match &self.check {
            RuleCheck::Strategy(s) => s.check(value),
            RuleCheck::Custom(f) => f(value),
        }
    }
}

/// Whether `value` is a string with non-whitespace content
pub fn non_empty_string(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.trim().is_empty())
}

/// Whether `value` is a non-empty array
pub fn non_empty_array(value: &Value) -> bool {
    value.as_array().is_some_and(|a| !a.is_empty())
}

/// Whether `value` is a number
pub fn is_number(value: &Value) -> bool {
    value.is_number()
}

/// Deep equality of two values
pub fn is_equal(left: &Value, right: &Value) -> bool {
    left == right
}

/// Whether `value` is a string shaped like an e-mail address
pub fn is_email(value: &Value) -> bool {
    value.as_str().is_some_and(|s| EMAIL_PATTERN.is_match(s))
}

/// Validator raising registry-resolved errors
#[derive(Debug, Clone)]
pub struct CustomValidator {
    codes: Arc<ErrorCodeRegistry>,
}

impl CustomValidator {
    /// Validator resolving failures against `codes`
    pub fn new(codes: Arc<ErrorCodeRegistry>) -> Self {
        Self { codes }
    }

    fn raise(&self, code_name: &str) -> Error {
        Error::Coded(self.codes.raise(code_name))
    }

    /// Evaluate `rules` in order, failing on the first that does not pass
    pub fn check_throws(&self, value: &Value, rules: &[ValidateRule]) -> Result<&Self> {
        match rules.iter().find(|rule| !rule.passes(value)) {
            Some(rule) => Err(self.raise(&rule.message)),
            None => Ok(self),
        }
    }

    /// Fail unless `value` is a non-empty string
    pub fn non_empty_string_throws(&self, value: &Value, message: Option<&str>) -> Result<&Self> {
        if non_empty_string(value) {
            Ok(self)
        } else {
            Err(self.raise(message.unwrap_or("Empty string")))
        }
    }

    /// Fail unless `value` is a number
    pub fn is_number_throws(&self, value: &Value, message: Option<&str>) -> Result<&Self> {
        if is_number(value) {
            Ok(self)
        } else {
            Err(self.raise(message.unwrap_or("Not a number")))
        }
    }

    /// Check `value` is a non-empty string, failing only when a message is given
    pub fn ensure_non_empty_string(&self, value: &Value, message: Option<&str>) -> Result<bool> {
        self.soft_check(non_empty_string(value), message)
    }

    /// Check `value` is a non-empty array, failing only when a message is given
    pub fn ensure_non_empty_array(&self, value: &Value, message: Option<&str>) -> Result<bool> {
        self.soft_check(non_empty_array(value), message)
    }

    /// Check `value` is a number, failing only when a message is given
    pub fn ensure_number(&self, value: &Value, message: Option<&str>) -> Result<bool> {
        self.soft_check(is_number(value), message)
    }

    /// Check deep equality, failing only when a message is given
    pub fn ensure_equal(&self, left: &Value, right: &Value, message: Option<&str>) -> Result<bool> {
        self.soft_check(is_equal(left, right), message)
    }

    fn soft_check(&self, passed: bool, message: Option<&str>) -> Result<bool> {
        match message {
            Some(m) if !passed && !m.trim().is_empty() => Err(self.raise(m)),
            _ => Ok(passed),
        }
    }
}
