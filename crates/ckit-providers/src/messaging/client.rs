//! Retrying messaging client
//!
//! ## Example
//!
//! ```ignore
//! use ckit_providers::messaging::{AmqpConnector, MqClient, message_handler};
//!
//! let client = MqClient::new("Orders", Arc::new(AmqpConnector::new()), options, retry);
//! client.run_as_consumer().await?;
//! client.assert_queue("orders", None).await?;
//!
//! let acker = client.clone();
//! client
//!     .consume_from_queue(
//!         "orders",
//!         message_handler(move |msg, content| {
//!             let acker = acker.clone();
//!             async move {
//!                 println!("{content}");
//!                 acker.ack_message(&msg).await
//!             }
//!         }),
//!         None,
//!     )
//!     .await?;
//! ```

use ckit_domain::error::{Error, Result};
use ckit_domain::ports::{BrokerConnector, BrokerSession, SessionEventStream};
use ckit_domain::value_objects::{
    ClientMode, ConnectionOptions, ConsumeOptions, Delivery, ExchangeKind, ExchangeOptions,
    PublishOptions, QueueOptions, RetryPolicy,
};
use futures::StreamExt;
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::constants::MQ_DEFAULT_EXCHANGE;

/// Async callback invoked once per delivered message
///
/// Receives the raw delivery and its body parsed as JSON, or the body as a
/// JSON string when it is not valid JSON.
pub type MessageHandler =
    Arc<dyn Fn(Delivery, Value) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Wrap an async closure as a [`MessageHandler`]
pub fn message_handler<F, Fut>(handler: F) -> MessageHandler
where
    F: Fn(Delivery, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |delivery, content| Box::pin(handler(delivery, content)))
}

#[derive(Default)]
struct ClientState {
    session: Option<Arc<dyn BrokerSession>>,
    mode: ClientMode,
    consumer_tag: String,
    current_retries: u32,
    terminating: bool,
    supervisor: Option<JoinHandle<()>>,
    consumers: Vec<JoinHandle<()>>,
}

struct Inner {
    prefix: String,
    connector: Arc<dyn BrokerConnector>,
    options: ConnectionOptions,
    retry: RetryPolicy,
    state: Mutex<ClientState>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if let Some(supervisor) = state.supervisor.take() {
            supervisor.abort();
        }
        for consumer in state.consumers.drain(..) {
            consumer.abort();
        }
    }
}

/// Broker client with a producer/consumer mode and bounded reconnects
///
/// Cloning is cheap; clones share the same session and state. Call
/// [`MqClient::terminate`] when done, which also stops the consumer tasks
/// holding clones of the client.
#[derive(Clone)]
pub struct MqClient {
    inner: Arc<Inner>,
}

impl MqClient {
    /// Create an idle, disconnected client
    ///
    /// `prefix` tags every log line and error message of this client.
    pub fn new(
        prefix: impl Into<String>,
        connector: Arc<dyn BrokerConnector>,
        options: ConnectionOptions,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                prefix: prefix.into(),
                connector,
                options,
                retry,
                state: Mutex::new(ClientState::default()),
            }),
        }
    }

    /// Log prefix of this client
    pub fn prefix(&self) -> &str {
        &self.inner.prefix
    }

    /// Current mode
    pub async fn mode(&self) -> ClientMode {
        self.inner.state.lock().await.mode
    }

    /// Reconnect attempts made since the last successful connection
    pub async fn current_retries(&self) -> u32 {
        self.inner.state.lock().await.current_retries
    }

    /// Whether a session is open
    pub async fn is_connected(&self) -> bool {
        self.inner.state.lock().await.session.is_some()
    }

    /// Tag of the active consumer, empty when not consuming
    pub async fn consumer_tag(&self) -> String {
        self.inner.state.lock().await.consumer_tag.clone()
    }

    /// Connect unless already connected
    ///
    /// A failed first attempt is returned to the caller and not retried.
    /// Once connected, session failures trigger automatic reconnects.
    pub async fn try_connect(&self) -> Result<()> {
        let inner = &self.inner;
        info!(
            client = %inner.prefix,
            "Attempting to connect to broker at {}:{}", inner.options.host, inner.options.port
        );
        let mut state = inner.state.lock().await;
        if state.session.is_some() {
            return Ok(());
        }

        let session: Arc<dyn BrokerSession> = match inner.connector.connect(&inner.options).await
        {
            Ok(session) => Arc::from(session),
            Err(e) => {
                error!(client = %inner.prefix, "Failed to connect: {e}");
                return Err(e);
            }
        };
        let events = session.events();
        state.session = Some(session);
        state.current_retries = 0;
        state.terminating = false;
        if let Some(old) = state.supervisor.take() {
            old.abort();
        }
        state.supervisor = Some(tokio::spawn(supervise(Arc::downgrade(inner), events)));
        info!(client = %inner.prefix, "Connected successfully");
        Ok(())
    }

    /// Connect if needed and switch to producer mode
    pub async fn run_as_producer(&self) -> Result<()> {
        self.run_as(ClientMode::Producer).await
    }

    /// Connect if needed and switch to consumer mode
    pub async fn run_as_consumer(&self) -> Result<()> {
        self.run_as(ClientMode::Consumer).await
    }

    async fn run_as(&self, mode: ClientMode) -> Result<()> {
        if !self.is_connected().await {
            self.try_connect().await?;
        }
        self.inner.state.lock().await.mode = mode;
        info!(client = %self.inner.prefix, "Running as {mode}");
        Ok(())
    }

    /// Declare a queue, durable and non-exclusive unless `options` says otherwise
    pub async fn assert_queue(&self, queue: &str, options: Option<QueueOptions>) -> Result<()> {
        let session = self.channel().await?;
        session
            .assert_queue(queue, &options.unwrap_or_default())
            .await
    }

    /// Declare an exchange
    pub async fn assert_exchange(
        &self,
        exchange: &str,
        kind: ExchangeKind,
        options: Option<ExchangeOptions>,
    ) -> Result<()> {
        let session = self.channel().await?;
        session
            .assert_exchange(exchange, kind, &options.unwrap_or_default())
            .await
    }

    /// Bind a queue to an exchange
    pub async fn bind_queue(&self, queue: &str, exchange: &str, routing_key: &str) -> Result<()> {
        let session = self.channel().await?;
        session.bind_queue(queue, exchange, routing_key).await
    }

    /// Publish `message` as JSON straight to `queue`
    ///
    /// Returns the broker's flow-control flag; `false` means back off.
    pub async fn publish_to_queue<M: Serialize + ?Sized>(
        &self,
        queue: &str,
        message: &M,
        options: Option<PublishOptions>,
    ) -> Result<bool> {
        self.publish(MQ_DEFAULT_EXCHANGE, queue, message, options)
            .await
            .inspect_err(|e| {
                error!(client = %self.inner.prefix, "Failed to publish message: {e}");
            })
    }

    /// Publish `message` as JSON to `exchange` with `routing_key`
    pub async fn publish_to_exchange<M: Serialize + ?Sized>(
        &self,
        exchange: &str,
        routing_key: &str,
        message: &M,
        options: Option<PublishOptions>,
    ) -> Result<bool> {
        self.publish(exchange, routing_key, message, options)
            .await
            .inspect_err(|e| {
                error!(client = %self.inner.prefix, "Failed to publish to exchange: {e}");
            })
    }

    async fn publish<M: Serialize + ?Sized>(
        &self,
        exchange: &str,
        routing_key: &str,
        message: &M,
        options: Option<PublishOptions>,
    ) -> Result<bool> {
        let session = self.session_in_mode(ClientMode::Producer).await?;
        let payload = serde_json::to_vec(message)?;
        session
            .publish(exchange, routing_key, payload, &options.unwrap_or_default())
            .await
    }

    /// Subscribe `handler` to `queue`
    ///
    /// Messages are handled one at a time in delivery order. A handler error
    /// is logged and the next message is processed.
    pub async fn consume_from_queue(
        &self,
        queue: &str,
        handler: MessageHandler,
        options: Option<ConsumeOptions>,
    ) -> Result<()> {
        let session = self.session_in_mode(ClientMode::Consumer).await?;
        let (tag, mut deliveries) = session
            .consume(queue, &options.unwrap_or_default())
            .await
            .inspect_err(|e| {
                error!(client = %self.inner.prefix, "Failed to consume from queue: {e}");
            })?;

        let prefix = self.inner.prefix.clone();
        let task = tokio::spawn(async move {
            while let Some(item) = deliveries.next().await {
                match item {
                    Ok(delivery) => {
                        let content = parse_content(&delivery.payload);
                        if let Err(e) = handler(delivery, content).await {
                            error!(client = %prefix, "Message handler failed: {e}");
                        }
                    }
                    Err(e) => {
                        error!(client = %prefix, "Consumer stream failed: {e}");
                        break;
                    }
                }
            }
        });

        let mut state = self.inner.state.lock().await;
        state.consumers.retain(|c| !c.is_finished());
        state.consumers.push(task);
        state.consumer_tag.clone_from(&tag);
        drop(state);

        info!(client = %self.inner.prefix, "Consumer started with tag: {tag}");
        info!(client = %self.inner.prefix, "Started consuming from queue: {queue}");
        Ok(())
    }

    /// Acknowledge a delivery
    pub async fn ack_message(&self, delivery: &Delivery) -> Result<()> {
        let session = self.session_in_mode(ClientMode::Consumer).await?;
        session.ack(delivery.delivery_tag).await
    }

    /// Reject a delivery, optionally putting it back on its queue
    pub async fn reject_message(&self, delivery: &Delivery, requeue: bool) -> Result<()> {
        let session = self.session_in_mode(ClientMode::Consumer).await?;
        session.reject(delivery.delivery_tag, requeue).await
    }

    /// Cancel the active consumer
    ///
    /// Does nothing without one. Failures are logged, never returned.
    pub async fn stop_consuming(&self) {
        let (session, tag) = {
            let state = self.inner.state.lock().await;
            match &state.session {
                Some(session) if !state.consumer_tag.is_empty() => {
                    (Arc::clone(session), state.consumer_tag.clone())
                }
                _ => return,
            }
        };

        match session.cancel(&tag).await {
            Ok(()) => {
                self.inner.state.lock().await.consumer_tag.clear();
                info!(client = %self.inner.prefix, "Stopped consuming");
            }
            Err(e) => error!(client = %self.inner.prefix, "Failed to stop consuming: {e}"),
        }
    }

    /// Limit unacknowledged deliveries; a zero `count` means one
    pub async fn prefetch(&self, count: u16, global: bool) -> Result<()> {
        let session = {
            let state = self.inner.state.lock().await;
            let session = state
                .session
                .clone()
                .ok_or_else(|| self.channel_not_init())?;
            if state.mode != ClientMode::Consumer {
                return Err(self.wrong_mode(ClientMode::Consumer));
            }
            session
        };
        let count = count.max(1);
        session.prefetch(count, global).await?;
        info!(client = %self.inner.prefix, "Prefetched {count} messages (global: {global})");
        Ok(())
    }

    /// Stop reconnecting, cancel consumers and close the session
    ///
    /// Teardown failures are logged. The client ends up idle and may be
    /// connected again with [`MqClient::try_connect`].
    pub async fn terminate(&self) {
        let (supervisor, consumers) = {
            let mut state = self.inner.state.lock().await;
            state.terminating = true;
            (state.supervisor.take(), std::mem::take(&mut state.consumers))
        };
        if let Some(supervisor) = supervisor {
            supervisor.abort();
        }

        self.stop_consuming().await;
        for consumer in consumers {
            consumer.abort();
        }

        let session = {
            let mut state = self.inner.state.lock().await;
            state.consumer_tag.clear();
            state.session.take()
        };
        if let Some(session) = session
            && let Err(e) = session.close().await
        {
            error!(client = %self.inner.prefix, "Error during termination: {e}");
        }

        self.inner.state.lock().await.mode = ClientMode::Idle;
        info!(client = %self.inner.prefix, "Client terminated");
    }

    async fn channel(&self) -> Result<Arc<dyn BrokerSession>> {
        self.inner
            .state
            .lock()
            .await
            .session
            .clone()
            .ok_or_else(|| self.channel_not_init())
    }

    async fn session_in_mode(&self, mode: ClientMode) -> Result<Arc<dyn BrokerSession>> {
        let state = self.inner.state.lock().await;
        if state.mode != mode {
            return Err(self.wrong_mode(mode));
        }
        state.session.clone().ok_or_else(|| self.channel_not_init())
    }

    fn channel_not_init(&self) -> Error {
        Error::invalid_state(format!("[{}] Channel instance not init", self.inner.prefix))
    }

    fn wrong_mode(&self, mode: ClientMode) -> Error {
        Error::invalid_state(format!(
            "[{}] Client is not in {mode} mode",
            self.inner.prefix
        ))
    }
}

impl std::fmt::Debug for MqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqClient")
            .field("prefix", &self.inner.prefix)
            .field("host", &self.inner.options.host)
            .field("port", &self.inner.options.port)
            .field("retry", &self.inner.retry)
            .finish_non_exhaustive()
    }
}

fn parse_content(payload: &[u8]) -> Value {
    serde_json::from_slice(payload)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(payload).into_owned()))
}

/// Watch the live session and reconnect after each failure
async fn supervise(inner: Weak<Inner>, mut events: SessionEventStream) {
    loop {
        let Some(event) = events.next().await else {
            return;
        };
        let Some(inner) = inner.upgrade() else {
            return;
        };
        if event.is_error() {
            error!(client = %inner.prefix, "{event}");
        } else {
            warn!(client = %inner.prefix, "{event}");
        }
        if inner.state.lock().await.terminating {
            return;
        }
        match reconnect(&inner).await {
            Some(next) => events = next,
            None => return,
        }
    }
}

/// Bounded fixed-interval reconnect loop
///
/// Returns the event stream of the new session, or `None` when the client is
/// terminating or the retry budget is spent.
async fn reconnect(inner: &Inner) -> Option<SessionEventStream> {
    let max = inner.retry.max_retries;
    let interval = inner.retry.retry_interval();
    loop {
        let attempt = {
            let mut state = inner.state.lock().await;
            if state.terminating {
                return None;
            }
            if state.current_retries >= max {
                error!(client = %inner.prefix, "Max retry attempts ({max}) reached. Giving up.");
                state.session = None;
                state.consumer_tag.clear();
                return None;
            }
            state.current_retries += 1;
            state.current_retries
        };
        info!(
            client = %inner.prefix,
            "Attempting to reconnect ({attempt}/{max}) in {}ms...", interval.as_millis()
        );
        tokio::time::sleep(interval).await;

        let stale = {
            let mut state = inner.state.lock().await;
            if state.terminating {
                return None;
            }
            state.consumer_tag.clear();
            state.session.take()
        };
        if let Some(stale) = stale {
            // the old session is usually dead already
            let _ = stale.close().await;
        }

        match inner.connector.connect(&inner.options).await {
            Ok(session) => {
                let session: Arc<dyn BrokerSession> = Arc::from(session);
                let events = session.events();
                let mut state = inner.state.lock().await;
                if state.terminating {
                    drop(state);
                    let _ = session.close().await;
                    return None;
                }
                state.session = Some(session);
                state.current_retries = 0;
                info!(client = %inner.prefix, "Reconnected successfully");
                if state.mode == ClientMode::Consumer {
                    info!(client = %inner.prefix, "Connection restored in consumer mode");
                }
                return Some(events);
            }
            Err(e) => error!(client = %inner.prefix, "Reconnection attempt failed: {e}"),
        }
    }
}
