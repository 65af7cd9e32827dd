//! Tests for HttpClient against a mock server

use ckit_providers::http::{HttpClient, HttpOption, HttpReply};
use mockito::{Matcher, Server};
use serde_json::{Value, json};

fn client() -> HttpClient {
    HttpClient::new().expect("client")
}

#[tokio::test]
async fn test_post_json_wraps_body_in_envelope() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/users")
        .match_header("content-type", "application/json")
        .match_header("x-request-id", "r-1")
        .match_body(Matcher::Json(json!({"name": "xxxhand", "age": 30})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":7}"#)
        .create_async()
        .await;

    let opt = HttpOption::new()
        .target_url(format!("{}/users", server.url()))
        .add_header("x-request-id", "r-1")
        .add_parameter("name", "xxxhand")
        .add_parameter("age", 30);
    let reply = client().try_post_json(&opt).await;

    mock.assert_async().await;
    assert!(reply.is_ok());
    let envelope = reply.into_envelope();
    assert_eq!(envelope.code, 0);
    assert_eq!(envelope.result, Some(json!({"id": 7})));
}

#[tokio::test]
async fn test_patch_json() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PATCH", "/users/7")
        .match_body(Matcher::Json(json!({"name": "renamed"})))
        .with_status(200)
        .with_body(r#"{"ok":true}"#)
        .create_async()
        .await;

    let opt = HttpOption::new()
        .target_url(format!("{}/users/7", server.url()))
        .add_parameter("name", "renamed");
    let reply = client().try_patch_json(&opt).await;

    mock.assert_async().await;
    assert_eq!(reply.value(), Some(&json!({"ok": true})));
}

#[tokio::test]
async fn test_raw_reply_when_envelope_disabled() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/raw")
        .with_status(200)
        .with_body(r#"[1,2,3]"#)
        .create_async()
        .await;

    let opt = HttpOption::new()
        .target_url(format!("{}/raw", server.url()))
        .non_use_custom_result();
    let reply = client().try_post_json(&opt).await;

    assert_eq!(reply, HttpReply::Raw(json!([1, 2, 3])));
}

#[tokio::test]
async fn test_error_status_with_body_keeps_status_code() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/users")
        .with_status(400)
        .with_body(r#"{"error":"name required"}"#)
        .create_async()
        .await;

    let url = format!("{}/users", server.url());
    let opt = HttpOption::new().target_url(url.clone());
    let envelope = client().try_post_json(&opt).await.into_envelope();

    assert_eq!(envelope.code, 400);
    assert_eq!(
        envelope.message,
        format!("[HttpClient] POST {url} fail: Request failed with status code 400")
    );
    assert_eq!(envelope.result, Some(json!({"error": "name required"})));
}

#[tokio::test]
async fn test_error_status_even_when_envelope_disabled() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/missing")
        .with_status(404)
        .with_body("not here")
        .create_async()
        .await;

    let opt = HttpOption::new()
        .target_url(format!("{}/missing", server.url()))
        .non_use_custom_result();
    let reply = client().try_get_json(&opt).await;

    assert!(!reply.is_ok());
    let envelope = reply.into_envelope();
    assert_eq!(envelope.code, 404);
    assert_eq!(envelope.result, Some(Value::String("not here".into())));
}

#[tokio::test]
async fn test_error_status_without_body_is_transport_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/boom")
        .with_status(500)
        .create_async()
        .await;

    let url = format!("{}/boom", server.url());
    let opt = HttpOption::new()
        .target_url(url.clone())
        .use_timeout_in_seconds(3);
    let envelope = client().try_get_json(&opt).await.into_envelope();

    assert_eq!(envelope.code, 499);
    assert!(envelope.message.starts_with(&format!("[HttpClient] GET {url} fail:")));
    let summary = envelope.result.expect("summary");
    assert_eq!(summary["method"], "GET");
    assert_eq!(summary["url"], json!(url));
    assert_eq!(summary["timeout"], 3000);
}

#[tokio::test]
async fn test_unreachable_host_is_transport_failure() {
    let opt = HttpOption::new()
        .target_url("http://127.0.0.1:1/nothing")
        .add_parameter("q", "x")
        .use_timeout_in_seconds(2);
    let envelope = client().try_post_json(&opt).await.into_envelope();

    assert_eq!(envelope.code, 499);
    assert!(envelope.message.starts_with("[HttpClient] POST http://127.0.0.1:1/nothing fail:"));
    let summary = envelope.result.expect("summary");
    assert_eq!(summary["data"], json!({"q": "x"}));
}

#[tokio::test]
async fn test_get_sends_parameters_as_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("term".into(), "rust lang".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"hits":[]}"#)
        .create_async()
        .await;

    let opt = HttpOption::new()
        .target_url(format!("{}/search", server.url()))
        .add_parameter("term", "rust lang")
        .add_parameter("page", 2);
    let reply = client().try_get_json(&opt).await;

    mock.assert_async().await;
    assert!(reply.is_ok());
}

#[tokio::test]
async fn test_post_url_encoded_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/token")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body("a=1&b=two")
        .with_status(200)
        .with_body(r#"{"token":"t"}"#)
        .create_async()
        .await;

    let opt = HttpOption::new()
        .target_url(format!("{}/token", server.url()))
        .add_parameter("a", 1)
        .add_parameter("b", "two");
    let reply = client().try_post_url_encode(&opt).await;

    mock.assert_async().await;
    assert_eq!(reply.value(), Some(&json!({"token": "t"})));
}

#[tokio::test]
async fn test_post_form_data_with_attachment() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/upload")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".into()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="title""#.into()),
            Matcher::Regex(r#"name="avatar"; filename="me.png""#.into()),
            Matcher::Regex("png-bytes".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"stored":true}"#)
        .create_async()
        .await;

    let opt = HttpOption::new()
        .target_url(format!("{}/upload", server.url()))
        .add_parameter("title", "profile")
        .add_attachment("avatar", "me.png", b"png-bytes".to_vec());
    let reply = client().try_post_form_data(&opt).await;

    mock.assert_async().await;
    assert!(reply.is_ok());
}

#[tokio::test]
async fn test_non_json_success_body_is_text() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_body("OK")
        .create_async()
        .await;

    let opt = HttpOption::new().target_url(format!("{}/health", server.url()));
    let reply = client().try_get_json(&opt).await;

    assert_eq!(reply.value(), Some(&Value::String("OK".into())));
}
