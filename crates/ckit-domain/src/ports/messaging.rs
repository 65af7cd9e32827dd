//! Message Broker Ports
//!
//! A [`BrokerConnector`] opens a [`BrokerSession`]: one connection plus one
//! channel. Sessions report their own failures through [`BrokerSession::events`]
//! so the owner can decide whether to reconnect.

use crate::error::Result;
use crate::value_objects::{
    ConnectionOptions, ConsumeOptions, Delivery, ExchangeKind, ExchangeOptions, PublishOptions,
    QueueOptions,
};
use async_trait::async_trait;
use futures::Stream;
use std::fmt;
use std::pin::Pin;

/// Stream of messages delivered to one consumer
pub type DeliveryStream = Pin<Box<dyn Stream<Item = Result<Delivery>> + Send + 'static>>;

/// Stream of lifecycle notifications from a session
pub type SessionEventStream = Pin<Box<dyn Stream<Item = SessionEvent> + Send + 'static>>;

/// Lifecycle notification emitted by a broker session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The connection reported an error
    ConnectionError(String),
    /// The connection was closed
    ConnectionClosed,
    /// The channel reported an error
    ChannelError(String),
    /// The channel was closed
    ChannelClosed,
}

impl SessionEvent {
    /// Whether the event reports an error rather than an orderly close
    pub fn is_error(&self) -> bool {
        matches!(self, Self::ConnectionError(_) | Self::ChannelError(_))
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Connection error: {e}"),
            Self::ConnectionClosed => f.write_str("Connection closed"),
            Self::ChannelError(e) => write!(f, "Channel error: {e}"),
            Self::ChannelClosed => f.write_str("Channel closed"),
        }
    }
}

/// Opens broker sessions
#[async_trait]
pub trait BrokerConnector: Send + Sync {
    /// Open a connection and a channel on it
    async fn connect(&self, options: &ConnectionOptions) -> Result<Box<dyn BrokerSession>>;
}

/// One live connection and channel
///
/// | Method | Purpose |
/// |--------|---------|
/// | `assert_queue` / `assert_exchange` / `bind_queue` | Topology |
/// | `publish` | Send a message, returns the flow-control flag |
/// | `consume` / `cancel` | Subscriptions |
/// | `ack` / `reject` / `prefetch` | Consumer flow |
/// | `events` | Failure notifications |
#[async_trait]
pub trait BrokerSession: Send + Sync {
    /// Declare a queue
    async fn assert_queue(&self, queue: &str, options: &QueueOptions) -> Result<()>;

    /// Declare an exchange
    async fn assert_exchange(
        &self,
        exchange: &str,
        kind: ExchangeKind,
        options: &ExchangeOptions,
    ) -> Result<()>;

    /// Bind a queue to an exchange
    async fn bind_queue(&self, queue: &str, exchange: &str, routing_key: &str) -> Result<()>;

    /// Publish a message
    ///
    /// `false` signals back-pressure. The empty exchange routes by queue name.
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: Vec<u8>,
        options: &PublishOptions,
    ) -> Result<bool>;

    /// Subscribe to a queue, returning the consumer tag and the message stream
    async fn consume(
        &self,
        queue: &str,
        options: &ConsumeOptions,
    ) -> Result<(String, DeliveryStream)>;

    /// Acknowledge a delivery
    async fn ack(&self, delivery_tag: u64) -> Result<()>;

    /// Reject a delivery, optionally putting it back on the queue
    async fn reject(&self, delivery_tag: u64, requeue: bool) -> Result<()>;

    /// Cancel a subscription
    async fn cancel(&self, consumer_tag: &str) -> Result<()>;

    /// Limit unacknowledged deliveries
    async fn prefetch(&self, count: u16, global: bool) -> Result<()>;

    /// Close the channel and the connection
    async fn close(&self) -> Result<()>;

    /// Failure notifications
    ///
    /// Only the first call receives events; later calls get a stream that
    /// ends immediately.
    fn events(&self) -> SessionEventStream;
}
