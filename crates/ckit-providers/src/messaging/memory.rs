//! In-process message broker
//!
//! Implements the broker ports without a server: queues, exchanges and
//! bindings live in shared memory, consumers are served round-robin and
//! unacknowledged deliveries return to their queue when a session goes away.
//!
//! Fault injection hooks make the reconnect logic of [`MqClient`] testable:
//!
//! ```ignore
//! let broker = InMemoryBroker::new();
//! let client = MqClient::new("Test", Arc::new(broker.clone()), options, retry);
//! client.try_connect().await?;
//!
//! broker.set_available(false);
//! broker.fail_sessions();
//! assert_eq!(broker.connect_attempts(), 1);
//! ```
//!
//! [`MqClient`]: super::MqClient

use async_trait::async_trait;
use ckit_domain::error::{Error, Result};
use ckit_domain::ports::{
    BrokerConnector, BrokerSession, DeliveryStream, SessionEvent, SessionEventStream,
};
use ckit_domain::value_objects::{
    ConnectionOptions, ConsumeOptions, Delivery, ExchangeKind, ExchangeOptions, PublishOptions,
    QueueOptions,
};
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::constants::MQ_DEFAULT_EXCHANGE;

#[derive(Debug, Clone)]
struct Message {
    exchange: String,
    routing_key: String,
    payload: Vec<u8>,
    redelivered: bool,
}

struct Consumer {
    tag: String,
    session: u64,
    no_ack: bool,
    sender: UnboundedSender<Result<Delivery>>,
}

#[derive(Default)]
struct Queue {
    options: QueueOptions,
    messages: VecDeque<Message>,
    consumers: Vec<Consumer>,
    cursor: usize,
}

struct Binding {
    exchange: String,
    queue: String,
    routing_key: String,
}

struct Unacked {
    session: u64,
    queue: String,
    message: Message,
}

#[derive(Default)]
struct SessionSlot {
    events: Option<UnboundedSender<SessionEvent>>,
    prefetch: Option<u16>,
}

#[derive(Default)]
struct Core {
    queues: HashMap<String, Queue>,
    exchanges: HashMap<String, ExchangeKind>,
    bindings: Vec<Binding>,
    sessions: HashMap<u64, SessionSlot>,
    unacked: HashMap<u64, Unacked>,
    next_session: u64,
    next_consumer: u64,
    next_delivery: u64,
}

impl Core {
    fn ensure_session(&self, id: u64) -> Result<()> {
        if self.sessions.contains_key(&id) {
            Ok(())
        } else {
            Err(Error::messaging("Channel closed"))
        }
    }

    fn route(&self, exchange: &str, routing_key: &str) -> Result<Vec<String>> {
        if exchange == MQ_DEFAULT_EXCHANGE {
            return Ok(self
                .queues
                .contains_key(routing_key)
                .then(|| vec![routing_key.to_string()])
                .unwrap_or_default());
        }
        let kind = self.exchanges.get(exchange).ok_or_else(|| {
            Error::messaging(format!("NOT_FOUND - no exchange '{exchange}'"))
        })?;
        let mut targets: Vec<String> = Vec::new();
        for binding in self.bindings.iter().filter(|b| b.exchange == exchange) {
            let matched = match kind {
                ExchangeKind::Direct => binding.routing_key == routing_key,
                ExchangeKind::Topic => topic_matches(&binding.routing_key, routing_key),
                ExchangeKind::Fanout | ExchangeKind::Headers | ExchangeKind::Match => true,
            };
            if matched && !targets.contains(&binding.queue) {
                targets.push(binding.queue.clone());
            }
        }
        Ok(targets)
    }

    fn has_capacity(&self, session: u64) -> bool {
        let Some(limit) = self.sessions.get(&session).and_then(|s| s.prefetch) else {
            return true;
        };
        let held = self.unacked.values().filter(|u| u.session == session).count();
        held < usize::from(limit)
    }

    /// Hand ready messages of `queue` to its consumers
    fn dispatch(&mut self, queue: &str) {
        loop {
            let Some(q) = self.queues.get(queue) else {
                return;
            };
            if q.messages.is_empty() || q.consumers.is_empty() {
                return;
            }
            let count = q.consumers.len();
            let chosen = (0..count).map(|offset| (q.cursor + offset) % count).find(|&i| {
                let consumer = &q.consumers[i];
                consumer.no_ack || self.has_capacity(consumer.session)
            });
            let Some(index) = chosen else {
                return;
            };

            self.next_delivery += 1;
            let delivery_tag = self.next_delivery;
            let Some(q) = self.queues.get_mut(queue) else {
                return;
            };
            let Some(message) = q.messages.pop_front() else {
                return;
            };
            let consumer = &q.consumers[index];
            let delivery = Delivery {
                delivery_tag,
                exchange: message.exchange.clone(),
                routing_key: message.routing_key.clone(),
                redelivered: message.redelivered,
                consumer_tag: consumer.tag.clone(),
                payload: message.payload.clone(),
            };
            if consumer.sender.unbounded_send(Ok(delivery)).is_err() {
                // receiver dropped: forget the consumer and retry the message
                q.messages.push_front(message);
                q.consumers.remove(index);
                q.cursor = 0;
                continue;
            }
            let no_ack = consumer.no_ack;
            let session = consumer.session;
            q.cursor = (index + 1) % count;
            if !no_ack {
                self.unacked.insert(
                    delivery_tag,
                    Unacked {
                        session,
                        queue: queue.to_string(),
                        message,
                    },
                );
            }
        }
    }

    fn dispatch_all(&mut self) {
        let names: Vec<String> = self.queues.keys().cloned().collect();
        for name in names {
            self.dispatch(&name);
        }
    }

    /// Put a delivery back at the head of its queue, marked as redelivered
    fn requeue(&mut self, unacked: Unacked) {
        if let Some(q) = self.queues.get_mut(&unacked.queue) {
            let mut message = unacked.message;
            message.redelivered = true;
            q.messages.push_front(message);
        }
    }

    /// Drop a session with its consumers, requeueing what it still holds
    fn remove_session(&mut self, id: u64) -> Option<SessionSlot> {
        let slot = self.sessions.remove(&id)?;
        for q in self.queues.values_mut() {
            q.consumers.retain(|c| c.session != id);
            q.cursor = 0;
        }
        let mut held: Vec<(u64, Unacked)> = Vec::new();
        self.unacked.retain(|&tag, u| {
            if u.session == id {
                held.push((
                    tag,
                    Unacked {
                        session: u.session,
                        queue: u.queue.clone(),
                        message: u.message.clone(),
                    },
                ));
                false
            } else {
                true
            }
        });
        // oldest first ends up at the head
        held.sort_by_key(|(tag, _)| std::cmp::Reverse(*tag));
        for (_, unacked) in held {
            self.requeue(unacked);
        }
        self.dispatch_all();
        Some(slot)
    }
}

struct BrokerState {
    available: AtomicBool,
    connect_attempts: AtomicUsize,
    core: Mutex<Core>,
}

impl BrokerState {
    fn core(&self) -> Result<MutexGuard<'_, Core>> {
        self.core
            .lock()
            .map_err(|_| Error::internal("In-memory broker lock poisoned"))
    }
}

/// Shared in-process broker
///
/// Clones share the same queues. Acts as its own [`BrokerConnector`].
#[derive(Clone)]
pub struct InMemoryBroker {
    state: Arc<BrokerState>,
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBroker {
    /// Create an empty broker that accepts connections
    pub fn new() -> Self {
        Self {
            state: Arc::new(BrokerState {
                available: AtomicBool::new(true),
                connect_attempts: AtomicUsize::new(0),
                core: Mutex::new(Core::default()),
            }),
        }
    }

    /// Accept or refuse new connections
    pub fn set_available(&self, available: bool) {
        self.state.available.store(available, Ordering::SeqCst);
    }

    /// Number of `connect` calls so far, refused ones included
    pub fn connect_attempts(&self) -> usize {
        self.state.connect_attempts.load(Ordering::SeqCst)
    }

    /// Drop every open session as if the connection was lost
    ///
    /// Each session reports a connection error followed by a close.
    /// Consumers are cancelled and unacknowledged messages are requeued.
    pub fn fail_sessions(&self) {
        let Ok(mut core) = self.state.core() else {
            return;
        };
        let ids: Vec<u64> = core.sessions.keys().copied().collect();
        for id in ids {
            if let Some(slot) = core.remove_session(id)
                && let Some(events) = slot.events
            {
                let _ = events.unbounded_send(SessionEvent::ConnectionError(
                    "Connection reset by broker".to_string(),
                ));
                let _ = events.unbounded_send(SessionEvent::ConnectionClosed);
            }
        }
    }

    /// Ready (undelivered) messages in `queue`
    pub fn queue_len(&self, queue: &str) -> usize {
        self.state
            .core()
            .ok()
            .and_then(|core| core.queues.get(queue).map(|q| q.messages.len()))
            .unwrap_or(0)
    }

    /// Delivered but not yet acknowledged messages
    pub fn unacked_count(&self) -> usize {
        self.state.core().map(|core| core.unacked.len()).unwrap_or(0)
    }

    /// Consumers subscribed to `queue`
    pub fn consumer_count(&self, queue: &str) -> usize {
        self.state
            .core()
            .ok()
            .and_then(|core| core.queues.get(queue).map(|q| q.consumers.len()))
            .unwrap_or(0)
    }

    /// Open sessions
    pub fn session_count(&self) -> usize {
        self.state.core().map(|core| core.sessions.len()).unwrap_or(0)
    }

    /// Whether `queue` was declared
    pub fn has_queue(&self, queue: &str) -> bool {
        self.state
            .core()
            .map(|core| core.queues.contains_key(queue))
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for InMemoryBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBroker")
            .field("available", &self.state.available.load(Ordering::SeqCst))
            .field("sessions", &self.session_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl BrokerConnector for InMemoryBroker {
    async fn connect(&self, options: &ConnectionOptions) -> Result<Box<dyn BrokerSession>> {
        self.state.connect_attempts.fetch_add(1, Ordering::SeqCst);
        if !self.state.available.load(Ordering::SeqCst) {
            return Err(Error::messaging(format!(
                "Connection refused: {}:{}",
                options.host, options.port
            )));
        }

        let (sender, receiver) = unbounded();
        let mut core = self.state.core()?;
        core.next_session += 1;
        let id = core.next_session;
        core.sessions.insert(
            id,
            SessionSlot {
                events: Some(sender),
                prefetch: None,
            },
        );
        debug!(session = id, "In-memory session opened");

        Ok(Box::new(InMemorySession {
            id,
            broker: Arc::clone(&self.state),
            events: Mutex::new(Some(receiver)),
        }))
    }
}

/// One session on an [`InMemoryBroker`]
struct InMemorySession {
    id: u64,
    broker: Arc<BrokerState>,
    events: Mutex<Option<UnboundedReceiver<SessionEvent>>>,
}

#[async_trait]
impl BrokerSession for InMemorySession {
    async fn assert_queue(&self, queue: &str, options: &QueueOptions) -> Result<()> {
        let mut core = self.broker.core()?;
        core.ensure_session(self.id)?;
        core.queues.entry(queue.to_string()).or_insert_with(|| Queue {
            options: *options,
            ..Queue::default()
        });
        Ok(())
    }

    async fn assert_exchange(
        &self,
        exchange: &str,
        kind: ExchangeKind,
        _options: &ExchangeOptions,
    ) -> Result<()> {
        let mut core = self.broker.core()?;
        core.ensure_session(self.id)?;
        match core.exchanges.get(exchange) {
            Some(existing) if *existing != kind => Err(Error::messaging(format!(
                "PRECONDITION_FAILED - inequivalent arg 'type' for exchange '{exchange}': \
                 received '{kind}' but current is '{existing}'"
            ))),
            Some(_) => Ok(()),
            None => {
                core.exchanges.insert(exchange.to_string(), kind);
                Ok(())
            }
        }
    }

    async fn bind_queue(&self, queue: &str, exchange: &str, routing_key: &str) -> Result<()> {
        let mut core = self.broker.core()?;
        core.ensure_session(self.id)?;
        if !core.queues.contains_key(queue) {
            return Err(Error::messaging(format!("NOT_FOUND - no queue '{queue}'")));
        }
        if !core.exchanges.contains_key(exchange) {
            return Err(Error::messaging(format!(
                "NOT_FOUND - no exchange '{exchange}'"
            )));
        }
        let exists = core
            .bindings
            .iter()
            .any(|b| b.exchange == exchange && b.queue == queue && b.routing_key == routing_key);
        if !exists {
            core.bindings.push(Binding {
                exchange: exchange.to_string(),
                queue: queue.to_string(),
                routing_key: routing_key.to_string(),
            });
        }
        Ok(())
    }

    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: Vec<u8>,
        _options: &PublishOptions,
    ) -> Result<bool> {
        let mut core = self.broker.core()?;
        core.ensure_session(self.id)?;
        let targets = core.route(exchange, routing_key)?;
        let message = Message {
            exchange: exchange.to_string(),
            routing_key: routing_key.to_string(),
            payload,
            redelivered: false,
        };
        for target in &targets {
            if let Some(q) = core.queues.get_mut(target) {
                q.messages.push_back(message.clone());
            }
            core.dispatch(target);
        }
        Ok(true)
    }

    async fn consume(
        &self,
        queue: &str,
        options: &ConsumeOptions,
    ) -> Result<(String, DeliveryStream)> {
        let mut core = self.broker.core()?;
        core.ensure_session(self.id)?;
        core.next_consumer += 1;
        let tag = options
            .consumer_tag
            .clone()
            .unwrap_or_else(|| format!("amq.ctag-{}", core.next_consumer));
        let q = core
            .queues
            .get_mut(queue)
            .ok_or_else(|| Error::messaging(format!("NOT_FOUND - no queue '{queue}'")))?;
        if options.exclusive && !q.consumers.is_empty() {
            return Err(Error::messaging(format!(
                "ACCESS_REFUSED - queue '{queue}' in use, cannot consume exclusively"
            )));
        }
        if q.options.exclusive && q.consumers.iter().any(|c| c.session != self.id) {
            return Err(Error::messaging(format!(
                "RESOURCE_LOCKED - queue '{queue}' is exclusive to another session"
            )));
        }

        let (sender, receiver) = unbounded();
        q.consumers.push(Consumer {
            tag: tag.clone(),
            session: self.id,
            no_ack: options.no_ack,
            sender,
        });
        core.dispatch(queue);
        Ok((tag, Box::pin(receiver)))
    }

    async fn ack(&self, delivery_tag: u64) -> Result<()> {
        let mut core = self.broker.core()?;
        core.ensure_session(self.id)?;
        let owned = core
            .unacked
            .get(&delivery_tag)
            .is_some_and(|u| u.session == self.id);
        if !owned {
            return Err(unknown_tag(delivery_tag));
        }
        core.unacked.remove(&delivery_tag);
        core.dispatch_all();
        Ok(())
    }

    async fn reject(&self, delivery_tag: u64, requeue: bool) -> Result<()> {
        let mut core = self.broker.core()?;
        core.ensure_session(self.id)?;
        let unacked = match core.unacked.remove(&delivery_tag) {
            Some(u) if u.session == self.id => u,
            Some(u) => {
                core.unacked.insert(delivery_tag, u);
                return Err(unknown_tag(delivery_tag));
            }
            None => return Err(unknown_tag(delivery_tag)),
        };
        if requeue {
            core.requeue(unacked);
        }
        core.dispatch_all();
        Ok(())
    }

    async fn cancel(&self, consumer_tag: &str) -> Result<()> {
        let mut core = self.broker.core()?;
        core.ensure_session(self.id)?;
        for q in core.queues.values_mut() {
            q.consumers
                .retain(|c| !(c.session == self.id && c.tag == consumer_tag));
            q.cursor = 0;
        }
        Ok(())
    }

    async fn prefetch(&self, count: u16, _global: bool) -> Result<()> {
        let mut core = self.broker.core()?;
        let slot = core
            .sessions
            .get_mut(&self.id)
            .ok_or_else(|| Error::messaging("Channel closed"))?;
        slot.prefetch = (count > 0).then_some(count);
        core.dispatch_all();
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let mut core = self.broker.core()?;
        if core.remove_session(self.id).is_some() {
            debug!(session = self.id, "In-memory session closed");
        }
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

fn unknown_tag(delivery_tag: u64) -> Error {
    Error::messaging(format!(
        "PRECONDITION_FAILED - unknown delivery tag {delivery_tag}"
    ))
}

/// AMQP topic matching: `*` is exactly one word, `#` is zero or more
fn topic_matches(pattern: &str, routing_key: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('.').collect();
    let key: Vec<&str> = routing_key.split('.').collect();
    match_words(&pattern, &key)
}

fn match_words(pattern: &[&str], key: &[&str]) -> bool {
    match pattern.split_first() {
        None => key.is_empty(),
        Some((&"#", rest)) => (0..=key.len()).any(|skip| match_words(rest, &key[skip..])),
        Some((&"*", rest)) => !key.is_empty() && match_words(rest, &key[1..]),
        Some((word, rest)) => key.first() == Some(word) && match_words(rest, &key[1..]),
    }
}
