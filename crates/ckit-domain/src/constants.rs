//! Domain constants
//!
//! Reserved error codes and defaults that every layer agrees on.

// ============================================================================
// RESERVED ERROR CODES
// ============================================================================

/// Code of a successful operation
pub const SUCCESS_CODE: i32 = 0;

/// Code name used when a code name is not registered
pub const OTHER_ERROR_CODE_NAME: &str = "ERR_OTHERS";

/// Code used when a code name is not registered or a foreign error is wrapped
pub const OTHER_ERROR_CODE: i32 = 99999;

/// Message used when an unregistered code name is empty
pub const OTHER_ERROR_MSG: &str = "Ops! Exception";

/// Code name reported by the timeout-race helper
pub const TIMEOUT_ERROR_CODE_NAME: &str = "ERR_TIMEOUT";

/// Code reported by the timeout-race helper
pub const TIMEOUT_ERROR_CODE: i32 = 99998;

/// Message reported by the timeout-race helper
pub const TIMEOUT_ERROR_MSG: &str = "Ops! Timeout";

/// HTTP status attached to unregistered or wrapped errors
pub const INTERNAL_SERVER_ERROR_STATUS: u16 = 500;

// ============================================================================
// CHARACTER SETS
// ============================================================================

/// Alphanumeric characters used by random string helpers
pub const BASIC_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Alphanumeric characters plus symbols
pub const COMPLEX_CHARS: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%&*.+-;";

/// Digits used by random number helpers
pub const NUMS: &str = "0123456789";

/// Default length of generated random strings
pub const SALT_ROUNDS: usize = 9;

// ============================================================================
// DEFAULTS
// ============================================================================

/// Default language when none can be negotiated
pub const DEFAULT_LANG: &str = "dev";

/// Default HTTP request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default JWT lifetime in seconds (one hour)
pub const DEFAULT_EXPIRES_IN_SECONDS: i64 = 60 * 60;
