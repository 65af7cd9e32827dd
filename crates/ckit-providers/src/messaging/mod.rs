//! Messaging
//!
//! [`MqClient`] owns one broker session and keeps it alive: when the session
//! reports an error or a close, the client reconnects on a fixed interval
//! until the retry budget runs out.
//!
//! ## Available Connectors
//!
//! | Connector | Backend | Description |
//! |-----------|---------|-------------|
//! | [`AmqpConnector`] | RabbitMQ | AMQP 0-9-1 through lapin (`mq-amqp`) |
//! | [`InMemoryBroker`] | Local | In-process broker with fault injection |

#[cfg(feature = "mq-amqp")]
pub mod amqp;
pub mod client;
pub mod memory;

#[cfg(feature = "mq-amqp")]
pub use amqp::AmqpConnector;
pub use client::{MessageHandler, MqClient, message_handler};
pub use memory::InMemoryBroker;
