//! Tests for the Redis client
//!
//! Tests that talk to a server are ignored by default; run them with
//! `cargo test -- --ignored` against a local Redis.

use ckit_domain::Error;
use ::redis::ConnectionAddr;
use ckit_providers::cache::{RedisClient, RedisOptions};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[test]
fn test_default_options_url() {
    assert_eq!(RedisOptions::default().url(), "redis://127.0.0.1:6379/0");
}

#[test]
fn test_url_with_password_and_db() {
    let options = RedisOptions {
        host: "cache.local".into(),
        port: 6380,
        password: Some("secret".into()),
        db: 3,
    };
    assert_eq!(options.url(), "redis://:***@cache.local:6380/3");

    let info = options.connection_info().unwrap();
    assert!(matches!(info.addr(), ConnectionAddr::Tcp(host, 6380) if host == "cache.local"));
    assert_eq!(info.redis_settings().db(), 3);
    assert_eq!(info.redis_settings().password(), Some("secret"));
}

#[test]
fn test_password_with_reserved_characters() {
    let options = RedisOptions {
        password: Some("s3cr#t/x?%".into()),
        ..RedisOptions::default()
    };
    let info = options.connection_info().unwrap();
    assert_eq!(info.redis_settings().password(), Some("s3cr#t/x?%"));
    assert!(::redis::Client::open(info).is_ok());
    assert!(!options.url().contains("s3cr"));
}

#[test]
fn test_empty_password_is_ignored() {
    let options = RedisOptions {
        password: Some(String::new()),
        ..RedisOptions::default()
    };
    assert_eq!(options.url(), "redis://127.0.0.1:6379/0");
    let info = options.connection_info().unwrap();
    assert_eq!(info.redis_settings().password(), None);
}

#[test]
fn test_instance_before_create_fails() {
    let client = RedisClient::new("Cache", RedisOptions::default());
    assert!(!client.is_connected());
    let err = client.instance().unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
    assert!(err.to_string().contains("[Cache] Redis instance not init"));
}

#[tokio::test]
async fn test_commands_before_create_fail() {
    let client = RedisClient::new("Cache", RedisOptions::default());
    assert!(client.ping().await.is_err());
    assert!(client.exists("key").await.is_err());
    assert!(client.get_json::<String>("key").await.is_err());
}

#[test]
fn test_close_without_connection_is_noop() {
    let client = RedisClient::new("Cache", RedisOptions::default());
    client.close();
    assert!(!client.is_connected());
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Session {
    user: String,
    roles: Vec<String>,
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_json_round_trip_against_server() {
    let client = RedisClient::new("Cache", RedisOptions::default());
    client.create().await.unwrap();
    client.ping().await.unwrap();

    let session = Session {
        user: "ada".into(),
        roles: vec!["admin".into()],
    };
    client
        .set_json("ckit:test:session", &session, Some(Duration::from_secs(30)))
        .await
        .unwrap();
    assert!(client.exists("ckit:test:session").await.unwrap());
    let back: Option<Session> = client.get_json("ckit:test:session").await.unwrap();
    assert_eq!(back, Some(session));

    assert!(client.delete("ckit:test:session").await.unwrap());
    assert!(!client.delete("ckit:test:session").await.unwrap());
    let gone: Option<Session> = client.get_json("ckit:test:session").await.unwrap();
    assert_eq!(gone, None);

    client.close();
    assert!(client.instance().is_err());
}
