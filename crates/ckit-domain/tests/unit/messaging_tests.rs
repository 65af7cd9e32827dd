//! Tests for messaging value objects

use ckit_domain::ports::SessionEvent;
use ckit_domain::value_objects::{
    ClientMode, ConnectionOptions, ConsumeOptions, ExchangeKind, PublishOptions, QueueOptions,
    RetryPolicy,
};
use std::time::Duration;

#[test]
fn test_queue_defaults() {
    let opts = QueueOptions::default();
    assert!(opts.durable);
    assert!(!opts.exclusive);
    assert!(!opts.auto_delete);
}

#[test]
fn test_queue_override_keeps_other_defaults() {
    let opts = QueueOptions {
        exclusive: true,
        ..QueueOptions::default()
    };
    assert!(opts.durable);
    assert!(opts.exclusive);
}

#[test]
fn test_consume_and_publish_defaults() {
    let consume = ConsumeOptions::default();
    assert!(!consume.no_ack);
    assert!(!consume.exclusive);
    assert!(PublishOptions::default().persistent);
}

#[test]
fn test_retry_policy_defaults() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_retries, 5);
    assert_eq!(policy.retry_interval(), Duration::from_millis(5000));
    assert_eq!(
        RetryPolicy::new(2, Duration::from_secs(1)).retry_interval_ms,
        1000
    );
}

#[test]
fn test_connection_defaults() {
    let opts = ConnectionOptions::default();
    assert_eq!(opts.heartbeat, 60);
    assert_eq!(opts.port, 5672);
}

#[test]
fn test_partial_connection_options_deserialize() {
    let opts: ConnectionOptions = serde_json::from_str(r#"{"host":"mq.local"}"#).unwrap();
    assert_eq!(opts.host, "mq.local");
    assert_eq!(opts.heartbeat, 60);
}

#[test]
fn test_exchange_kind_names() {
    assert_eq!(ExchangeKind::Topic.as_str(), "topic");
    assert_eq!(ExchangeKind::Match.to_string(), "match");
}

#[test]
fn test_client_mode_default_is_idle() {
    assert_eq!(ClientMode::default(), ClientMode::Idle);
    assert_eq!(ClientMode::Consumer.to_string(), "consumer");
}

#[test]
fn test_session_event_kinds() {
    assert!(SessionEvent::ChannelError("x".into()).is_error());
    assert!(!SessionEvent::ConnectionClosed.is_error());
}
