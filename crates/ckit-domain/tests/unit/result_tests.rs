//! Tests for the result envelope

use ckit_domain::CustomResult;

#[test]
fn test_default_is_ok() {
    let res = CustomResult::<String>::new();
    assert!(res.is_ok());
    assert_eq!(res.code, 0);
    assert_eq!(res.message, "");
    assert_eq!(res.result, None);
}

#[test]
fn test_with_result() {
    let res = CustomResult::new().with_result("I am result");
    assert_eq!(res.result, Some("I am result"));
}

#[test]
fn test_non_zero_code_is_not_ok() {
    let res = CustomResult::<()>::new()
        .with_code(99998)
        .with_message("Ops! Timeout")
        .with_trace_id("abc");
    assert!(!res.is_ok());
    assert_eq!(res.trace_id, "abc");
}

#[test]
fn test_serializes_in_camel_case() {
    let res = CustomResult::new().with_trace_id("t-1").with_result(1);
    let json = serde_json::to_value(&res).unwrap();
    assert_eq!(json["traceId"], "t-1");
    assert_eq!(json["code"], 0);
    assert_eq!(json["result"], 1);
}

#[test]
fn test_map_keeps_envelope_fields() {
    let res = CustomResult::new().with_code(7).with_result(2).map(|v| v * 10);
    assert_eq!(res.code, 7);
    assert_eq!(res.result, Some(20));
}
