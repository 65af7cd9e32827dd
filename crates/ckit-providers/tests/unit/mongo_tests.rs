//! Tests for the MongoDB client
//!
//! Tests that talk to a server are ignored by default; run them with
//! `cargo test -- --ignored` against a local MongoDB.

use ckit_domain::Error;
use ckit_providers::db::{MongoClient, MongoOptions};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn options() -> MongoOptions {
    MongoOptions {
        uri: "mongodb://localhost:27017".into(),
        db: "hand_test".into(),
        ..MongoOptions::default()
    }
}

#[test]
fn test_default_options() {
    let opts = MongoOptions::default();
    assert_eq!(opts.uri, "mongodb://127.0.0.1:27017");
    assert_eq!(opts.db, "");
    assert_eq!(opts.min_pool_size, 1);
    assert_eq!(opts.max_pool_size, 10);
    assert_eq!(opts.connect_timeout_ms, 30_000);
    assert!(opts.user().is_none());
}

#[test]
fn test_empty_uri_is_rejected() {
    let err = MongoClient::new(
        "Orders",
        MongoOptions {
            uri: String::new(),
            ..options()
        },
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert!(err.to_string().contains("[Orders] uri is empty"));
}

#[test]
fn test_empty_db_name_is_rejected() {
    let err = MongoClient::new(
        "Orders",
        MongoOptions {
            db: " ".into(),
            ..options()
        },
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert!(err.to_string().contains("[Orders] db name is empty"));
}

#[tokio::test]
async fn test_client_options_carry_pool_and_timeout() {
    let opts = MongoOptions {
        min_pool_size: 2,
        max_pool_size: 20,
        connect_timeout_ms: 1_500,
        ..options()
    };
    let driver = opts.client_options().await.unwrap();
    assert_eq!(driver.min_pool_size, Some(2));
    assert_eq!(driver.max_pool_size, Some(20));
    assert_eq!(driver.connect_timeout, Some(Duration::from_millis(1_500)));
    assert!(driver.credential.is_none());
}

#[tokio::test]
async fn test_client_options_with_credentials() {
    let opts = MongoOptions {
        user: Some("ada".into()),
        pass: Some("p@ss/word".into()),
        ..options()
    };
    let credential = opts.client_options().await.unwrap().credential.unwrap();
    assert_eq!(credential.username.as_deref(), Some("ada"));
    assert_eq!(credential.password.as_deref(), Some("p@ss/word"));

    let blank_user = MongoOptions {
        user: Some("  ".into()),
        ..options()
    };
    assert!(blank_user.client_options().await.unwrap().credential.is_none());
}

#[test]
fn test_get_collection_before_connect_fails() {
    let client = MongoClient::new("Orders", options()).unwrap();
    assert!(!client.is_connected());
    let err = client.get_collection::<Order>("orders").unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
    assert!(err.to_string().contains("[Orders] DB is undefined"));
}

#[test]
fn test_close_without_connection_is_noop() {
    let client = MongoClient::new("Orders", options()).unwrap();
    client.close();
    assert!(!client.is_connected());
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Order {
    hand: String,
    val: String,
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn test_insert_and_find_against_server() {
    use mongodb::bson::doc;

    let client = MongoClient::new("Orders", options()).unwrap();
    let orders = client.get_collection_async::<Order>("handTest").await.unwrap();
    assert!(client.is_connected());

    let order = Order {
        hand: "test".into(),
        val: "xxx".into(),
    };
    orders.insert_one(&order).await.unwrap();
    let found = orders.find_one(doc! { "hand": "test" }).await.unwrap();
    assert_eq!(found.map(|o| o.val), Some("xxx".to_string()));

    orders.delete_many(doc! { "hand": "test" }).await.unwrap();
    client.close();
    assert!(client.get_collection::<Order>("handTest").is_err());
}
