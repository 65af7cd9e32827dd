//! Infrastructure layer constants
//!
//! Domain-wide constants live in `ckit_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "ckit.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "ckit";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "CKIT";

/// Separator between nested keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "CKIT_LOG";

/// Log file stem used when the configured path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "ckit";

// ============================================================================
// AUTHENTICATION CONSTANTS
// ============================================================================

/// The only supported JWT signing algorithm
pub const JWT_ALGORITHM: &str = "RS256";

// ============================================================================
// TIMER CONSTANTS
// ============================================================================

/// Error raised when a terminated timer is reused without `renew`
pub const TIMER_TERMINATED_MSG: &str =
    "The timer has been terminated. Please create a new instance.";

/// Error raised when a race is started while another is in flight
pub const TIMER_BUSY_MSG: &str = "The timer is already running a task";

// ============================================================================
// UTILITY CONSTANTS
// ============================================================================

/// Error raised by `split_array` for a zero chunk size
pub const CHUNK_SIZE_ERROR_MSG: &str = "Chunk size must be greater than 0";
