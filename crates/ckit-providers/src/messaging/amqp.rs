//! AMQP 0-9-1 connector
//!
//! Opens one lapin connection and one channel per session. Connection and
//! channel errors reported by lapin are forwarded as [`SessionEvent`]s.

use async_trait::async_trait;
use ckit_domain::error::{Error, Result};
use ckit_domain::ports::{
    BrokerConnector, BrokerSession, DeliveryStream, SessionEvent, SessionEventStream,
};
use ckit_domain::value_objects::{
    ConnectionOptions, ConsumeOptions, Delivery, ExchangeKind, ExchangeOptions, PublishOptions,
    QueueOptions,
};
use futures::StreamExt;
use futures::channel::mpsc::{UnboundedReceiver, unbounded};
use lapin::options::{
    BasicAckOptions, BasicCancelOptions, BasicConsumeOptions, BasicPublishOptions,
    BasicQosOptions, BasicRejectOptions, ConfirmSelectOptions, ExchangeDeclareOptions,
    QueueBindOptions, QueueDeclareOptions,
};
use lapin::publisher_confirm::Confirmation;
use lapin::types::{FieldTable, ShortString};
use lapin::uri::{AMQPAuthority, AMQPUri, AMQPUserInfo};
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use std::sync::Mutex;
use tracing::{debug, info, warn};

use crate::constants::{
    AMQP_CLOSE_REASON, AMQP_PERSISTENT_DELIVERY_MODE, AMQP_REPLY_SUCCESS, JSON_CONTENT_TYPE,
};

fn amqp_error(action: &str, e: lapin::Error) -> Error {
    Error::messaging_with_source(format!("{action}: {e}"), e)
}

fn exchange_kind(kind: ExchangeKind) -> lapin::ExchangeKind {
    match kind {
        ExchangeKind::Direct => lapin::ExchangeKind::Direct,
        ExchangeKind::Topic => lapin::ExchangeKind::Topic,
        ExchangeKind::Headers => lapin::ExchangeKind::Headers,
        ExchangeKind::Fanout => lapin::ExchangeKind::Fanout,
        ExchangeKind::Match => lapin::ExchangeKind::Custom(kind.as_str().to_string()),
    }
}

fn properties(options: &PublishOptions) -> BasicProperties {
    let mut props = BasicProperties::default().with_content_type(ShortString::from(
        options
            .content_type
            .clone()
            .unwrap_or_else(|| JSON_CONTENT_TYPE.to_string()),
    ));
    if options.persistent {
        props = props.with_delivery_mode(AMQP_PERSISTENT_DELIVERY_MODE);
    }
    if let Some(priority) = options.priority {
        props = props.with_priority(priority);
    }
    if let Some(expiration) = &options.expiration {
        props = props.with_expiration(ShortString::from(expiration.clone()));
    }
    if let Some(correlation_id) = &options.correlation_id {
        props = props.with_correlation_id(ShortString::from(correlation_id.clone()));
    }
    if let Some(message_id) = &options.message_id {
        props = props.with_message_id(ShortString::from(message_id.clone()));
    }
    props
}

/// Connector for RabbitMQ and other AMQP 0-9-1 brokers
#[derive(Debug, Clone, Default)]
pub struct AmqpConnector;

impl AmqpConnector {
    /// Create a connector
    pub fn new() -> Self {
        Self
    }

    fn uri(options: &ConnectionOptions) -> AMQPUri {
        let mut uri = AMQPUri {
            authority: AMQPAuthority {
                userinfo: AMQPUserInfo {
                    username: options.username.clone(),
                    password: options.password.clone(),
                },
                host: options.host.clone(),
                port: options.port,
            },
            vhost: options.vhost.clone(),
            ..AMQPUri::default()
        };
        uri.query.heartbeat = Some(options.heartbeat);
        uri
    }
}

#[async_trait]
impl BrokerConnector for AmqpConnector {
    async fn connect(&self, options: &ConnectionOptions) -> Result<Box<dyn BrokerSession>> {
        let address = format!("{}:{}", options.host, options.port);
        let connection =
            Connection::connect_uri(Self::uri(options), ConnectionProperties::default())
                .await
                .map_err(|e| amqp_error(&format!("Failed to connect to {address}"), e))?;
        let channel = connection
            .create_channel()
            .await
            .map_err(|e| amqp_error("Failed to create channel", e))?;
        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await
            .map_err(|e| amqp_error("Failed to enable publisher confirms", e))?;

        let (sender, receiver) = unbounded();
        let on_connection = sender.clone();
        connection.on_error(move |e| {
            let _ = on_connection.unbounded_send(SessionEvent::ConnectionError(e.to_string()));
            let _ = on_connection.unbounded_send(SessionEvent::ConnectionClosed);
        });
        channel.on_error(move |e| {
            let _ = sender.unbounded_send(SessionEvent::ChannelError(e.to_string()));
            let _ = sender.unbounded_send(SessionEvent::ChannelClosed);
        });

        info!("Connection established to {address}");
        Ok(Box::new(AmqpSession {
            connection,
            channel,
            events: Mutex::new(Some(receiver)),
        }))
    }
}

struct AmqpSession {
    connection: Connection,
    channel: Channel,
    events: Mutex<Option<UnboundedReceiver<SessionEvent>>>,
}

#[async_trait]
impl BrokerSession for AmqpSession {
    async fn assert_queue(&self, queue: &str, options: &QueueOptions) -> Result<()> {
        self.channel
            .queue_declare(
                queue,
                QueueDeclareOptions {
                    durable: options.durable,
                    exclusive: options.exclusive,
                    auto_delete: options.auto_delete,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map(|_| ())
            .map_err(|e| amqp_error(&format!("Failed to assert queue {queue}"), e))
    }

    async fn assert_exchange(
        &self,
        exchange: &str,
        kind: ExchangeKind,
        options: &ExchangeOptions,
    ) -> Result<()> {
        self.channel
            .exchange_declare(
                exchange,
                exchange_kind(kind),
                ExchangeDeclareOptions {
                    durable: options.durable,
                    internal: options.internal,
                    auto_delete: options.auto_delete,
                    ..ExchangeDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| amqp_error(&format!("Failed to assert exchange {exchange}"), e))
    }

    async fn bind_queue(&self, queue: &str, exchange: &str, routing_key: &str) -> Result<()> {
        self.channel
            .queue_bind(
                queue,
                exchange,
                routing_key,
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(|e| amqp_error(&format!("Failed to bind {queue} to {exchange}"), e))
    }

    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: Vec<u8>,
        options: &PublishOptions,
    ) -> Result<bool> {
        let confirm = self
            .channel
            .basic_publish(
                exchange,
                routing_key,
                BasicPublishOptions {
                    mandatory: options.mandatory,
                    ..BasicPublishOptions::default()
                },
                &payload,
                properties(options),
            )
            .await
            .map_err(|e| amqp_error("Failed to publish", e))?;
        let confirmation = confirm
            .await
            .map_err(|e| amqp_error("Publish was not confirmed", e))?;
        let accepted = is_accepted(&confirmation);
        if !accepted {
            warn!(exchange, routing_key, "Broker did not accept the publish: {confirmation:?}");
        }
        Ok(accepted)
    }

    async fn consume(
        &self,
        queue: &str,
        options: &ConsumeOptions,
    ) -> Result<(String, DeliveryStream)> {
        let consumer = self
            .channel
            .basic_consume(
                queue,
                options.consumer_tag.as_deref().unwrap_or_default(),
                BasicConsumeOptions {
                    no_ack: options.no_ack,
                    exclusive: options.exclusive,
                    ..BasicConsumeOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| amqp_error(&format!("Failed to consume from {queue}"), e))?;

        let tag = consumer.tag().as_str().to_string();
        let consumer_tag = tag.clone();
        let stream = consumer.map(move |item| {
            item.map(|delivery| Delivery {
                delivery_tag: delivery.delivery_tag,
                exchange: delivery.exchange.as_str().to_string(),
                routing_key: delivery.routing_key.as_str().to_string(),
                redelivered: delivery.redelivered,
                consumer_tag: consumer_tag.clone(),
                payload: delivery.data.clone(),
            })
            .map_err(|e| amqp_error("Consumer failed", e))
        });
        Ok((tag, Box::pin(stream)))
    }

    async fn ack(&self, delivery_tag: u64) -> Result<()> {
        self.channel
            .basic_ack(delivery_tag, BasicAckOptions::default())
            .await
            .map_err(|e| amqp_error("Failed to ack", e))
    }

    async fn reject(&self, delivery_tag: u64, requeue: bool) -> Result<()> {
        self.channel
            .basic_reject(delivery_tag, BasicRejectOptions { requeue })
            .await
            .map_err(|e| amqp_error("Failed to reject", e))
    }

    async fn cancel(&self, consumer_tag: &str) -> Result<()> {
        self.channel
            .basic_cancel(consumer_tag, BasicCancelOptions::default())
            .await
            .map_err(|e| amqp_error("Failed to cancel consumer", e))
    }

    async fn prefetch(&self, count: u16, global: bool) -> Result<()> {
        self.channel
            .basic_qos(count, BasicQosOptions { global })
            .await
            .map_err(|e| amqp_error("Failed to set prefetch", e))
    }

    async fn close(&self) -> Result<()> {
        if self.channel.status().connected() {
            self.channel
                .close(AMQP_REPLY_SUCCESS, AMQP_CLOSE_REASON)
                .await
                .map_err(|e| amqp_error("Failed to close channel", e))?;
        }
        if self.connection.status().connected() {
            self.connection
                .close(AMQP_REPLY_SUCCESS, AMQP_CLOSE_REASON)
                .await
                .map_err(|e| amqp_error("Failed to close connection", e))?;
        }
        debug!("AMQP session closed");
        Ok(())
    }

    fn events(&self) -> SessionEventStream {
        let receiver = self.events.lock().ok().and_then(|mut slot| slot.take());
        match receiver {
            Some(receiver) => Box::pin(receiver),
            None => Box::pin(futures::stream::empty()),
        }
    }
}

/// An ack without a returned message; nacks and mandatory returns are refusals
fn is_accepted(confirmation: &Confirmation) -> bool {
    matches!(confirmation, Confirmation::Ack(None))
}
