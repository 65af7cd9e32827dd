//! Error extension utilities
//!
//! Maps foreign errors (I/O, figment, jsonwebtoken, reqwest, redis, lapin)
//! into the domain [`Error`] while keeping the original as `source`.

use ckit_domain::error::{Error, Result};
use std::fmt;

type BoxedSource = Option<Box<dyn std::error::Error + Send + Sync>>;

/// Extension trait for adding context to errors
///
/// # Example
///
/// ```ignore
/// use ckit_infrastructure::error_ext::ErrorContext;
///
/// let content = std::fs::read_to_string(&path)
///     .io_context(format!("Failed to read {}", path.display()))?;
///
/// let token = encode(&header, &claims, &key).auth_context("Failed to sign token")?;
/// ```
pub trait ErrorContext<T> {
    /// Add context, converting the error into an infrastructure error
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Add lazily built context
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;

    /// Add context for I/O operations
    fn io_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Add context for configuration operations
    fn config_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Add context for authentication operations
    fn auth_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Add context for network operations
    fn network_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Add context for message broker operations
    fn messaging_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        wrap(self, context, |message, source| Error::Infrastructure { message, source })
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|err| Error::Infrastructure {
            message: format!("{}: {}", f(), err),
            source: Some(Box::new(err)),
        })
    }

    fn io_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        wrap(self, context, |message, source| Error::Io { message, source })
    }

    fn config_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        wrap(self, context, |message, source| Error::Configuration { message, source })
    }

    fn auth_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        wrap(self, context, |message, source| Error::Authentication { message, source })
    }

    fn network_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        wrap(self, context, |message, source| Error::Network { message, source })
    }

    fn messaging_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        wrap(self, context, |message, source| Error::Messaging { message, source })
    }
}

fn wrap<T, E, C>(
    result: std::result::Result<T, E>,
    context: C,
    build: impl FnOnce(String, BoxedSource) -> Error,
) -> Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
    C: fmt::Display,
{
    result.map_err(|err| build(format!("{context}: {err}"), Some(Box::new(err))))
}

/// Convert a foreign error into an infrastructure error with context
pub fn to_domain_error<E>(error: E, context: &str) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    Error::Infrastructure {
        message: format!("{context}: {error}"),
        source: Some(Box::new(error)),
    }
}
