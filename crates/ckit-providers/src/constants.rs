//! Provider layer constants

// ============================================================================
// MESSAGING CONSTANTS
// ============================================================================

/// Default log prefix of the messaging client
pub const MQ_DEFAULT_PREFIX: &str = "MQClient";

/// Exchange name that routes directly by queue name
pub const MQ_DEFAULT_EXCHANGE: &str = "";

/// Reply code sent when closing a channel or connection normally
pub const AMQP_REPLY_SUCCESS: u16 = 200;

/// Reply text sent when closing a channel or connection normally
pub const AMQP_CLOSE_REASON: &str = "Bye";

/// AMQP delivery mode for persistent messages
pub const AMQP_PERSISTENT_DELIVERY_MODE: u8 = 2;

/// Content type stamped on JSON publishes when none is given
pub const JSON_CONTENT_TYPE: &str = "application/json";

// ============================================================================
// HTTP CONSTANTS
// ============================================================================

/// Log prefix of the HTTP client
pub const HTTP_CLIENT_PREFIX: &str = "[HttpClient]";

/// Envelope code for failures without a server response
pub const HTTP_TRANSPORT_ERROR_CODE: i32 = 499;

/// Default request timeout in seconds
pub const HTTP_DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// CACHE CONSTANTS
// ============================================================================

/// Default log prefix of the Redis client
pub const REDIS_DEFAULT_PREFIX: &str = "RedisClient";

/// Default Redis host
pub const REDIS_DEFAULT_HOST: &str = "127.0.0.1";

/// Default Redis port
pub const REDIS_DEFAULT_PORT: u16 = 6379;

// ============================================================================
// DATABASE CONSTANTS
// ============================================================================

/// Default log prefix of the MongoDB client
pub const MONGO_DEFAULT_PREFIX: &str = "MongoClient";

/// Default MongoDB connection string
pub const MONGO_DEFAULT_URI: &str = "mongodb://127.0.0.1:27017";

/// Default minimum pool size
pub const MONGO_DEFAULT_MIN_POOL_SIZE: u32 = 1;

/// Default maximum pool size
pub const MONGO_DEFAULT_MAX_POOL_SIZE: u32 = 10;

/// Default connect timeout in milliseconds
pub const MONGO_DEFAULT_CONNECT_TIMEOUT_MS: u64 = 30_000;

// ============================================================================
// MAIL CONSTANTS
// ============================================================================

/// Log prefix of the mail client
pub const MAIL_CLIENT_PREFIX: &str = "[MailClient]";

/// Default SMTP submission port
pub const SMTP_DEFAULT_PORT: u16 = 587;

/// Content type of attachments without one
pub const MAIL_DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
