//! Messaging value objects
//!
//! Options and payload types shared by the messaging client and the broker
//! connectors. Defaults follow common AMQP 0-9-1 practice: durable queues,
//! manual acknowledgement and persistent publishes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default broker heartbeat in seconds
pub const DEFAULT_HEARTBEAT_SECS: u16 = 60;

/// Default number of reconnect attempts before giving up
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default delay between reconnect attempts in milliseconds
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 5000;

/// Role the messaging client currently plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientMode {
    /// Not yet producing or consuming
    #[default]
    Idle,
    /// Publishing messages
    Producer,
    /// Consuming messages
    Consumer,
}

impl fmt::Display for ClientMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Producer => "producer",
            Self::Consumer => "consumer",
        };
        f.write_str(s)
    }
}

/// Exchange routing type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeKind {
    /// Exact routing-key match
    Direct,
    /// Pattern routing-key match (`*` one word, `#` zero or more)
    Topic,
    /// Header-table match
    Headers,
    /// Every bound queue
    Fanout,
    /// Header-table match (legacy name)
    Match,
}

impl ExchangeKind {
    /// Wire name of the exchange type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Topic => "topic",
            Self::Headers => "headers",
            Self::Fanout => "fanout",
            Self::Match => "match",
        }
    }
}

impl fmt::Display for ExchangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broker connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionOptions {
    /// Broker host name
    pub host: String,
    /// Broker port
    pub port: u16,
    /// User name
    pub username: String,
    /// Password
    pub password: String,
    /// Virtual host
    pub vhost: String,
    /// Heartbeat interval in seconds
    pub heartbeat: u16,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5672,
            username: "guest".to_string(),
            password: "guest".to_string(),
            vhost: "/".to_string(),
            heartbeat: DEFAULT_HEARTBEAT_SECS,
        }
    }
}

/// Bounded fixed-interval reconnect policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Attempts allowed before giving up
    pub max_retries: u32,
    /// Delay before each attempt, in milliseconds
    pub retry_interval_ms: u64,
}

impl RetryPolicy {
    /// Create a policy
    pub fn new(max_retries: u32, retry_interval: Duration) -> Self {
        Self {
            max_retries,
            retry_interval_ms: u64::try_from(retry_interval.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Delay before each attempt
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_interval_ms: DEFAULT_RETRY_INTERVAL_MS,
        }
    }
}

/// Queue declaration options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueOptions {
    /// Survive broker restarts
    pub durable: bool,
    /// Restricted to the declaring connection
    pub exclusive: bool,
    /// Deleted once the last consumer leaves
    pub auto_delete: bool,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            durable: true,
            exclusive: false,
            auto_delete: false,
        }
    }
}

/// Exchange declaration options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeOptions {
    /// Survive broker restarts
    pub durable: bool,
    /// Not publishable by clients
    pub internal: bool,
    /// Deleted once the last binding goes away
    pub auto_delete: bool,
}

impl Default for ExchangeOptions {
    fn default() -> Self {
        Self {
            durable: true,
            internal: false,
            auto_delete: false,
        }
    }
}

/// Consumer subscription options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumeOptions {
    /// Broker acknowledges on delivery
    pub no_ack: bool,
    /// Sole consumer of the queue
    pub exclusive: bool,
    /// Requested consumer tag, broker-generated when absent
    pub consumer_tag: Option<String>,
}

/// Publish options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishOptions {
    /// Persist the message to disk
    pub persistent: bool,
    /// Return the message when it cannot be routed
    pub mandatory: bool,
    /// MIME content type
    pub content_type: Option<String>,
    /// Message priority
    pub priority: Option<u8>,
    /// Per-message TTL in milliseconds, as a string
    pub expiration: Option<String>,
    /// Correlation identifier
    pub correlation_id: Option<String>,
    /// Application message identifier
    pub message_id: Option<String>,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            persistent: true,
            mandatory: false,
            content_type: None,
            priority: None,
            expiration: None,
            correlation_id: None,
            message_id: None,
        }
    }
}

/// A message delivered to a consumer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Channel-scoped delivery tag used for ack/reject
    pub delivery_tag: u64,
    /// Exchange the message was published to
    pub exchange: String,
    /// Routing key the message was published with
    pub routing_key: String,
    /// Whether the message was delivered before
    pub redelivered: bool,
    /// Tag of the consumer receiving the message
    pub consumer_tag: String,
    /// Raw message body
    pub payload: Vec<u8>,
}

impl Delivery {
    /// Body decoded as UTF-8, invalid sequences replaced
    pub fn payload_str(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}
