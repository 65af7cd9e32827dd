//! Tests for registry-resolved errors

use ckit_domain::{CustomError, Error, ErrorCode, ErrorCodeRegistry, MessageArg};

fn registry() -> ErrorCodeRegistry {
    ErrorCodeRegistry::from_codes(vec![
        ErrorCode::new("SUCCESS", 0, 200, ""),
        ErrorCode::new("ERR_NAME_IS_EMPTY", 10001, 400, "Input name is empty"),
        ErrorCode::new("ERR_TOO_LONG", 10002, 400, "Field %s exceeds %i chars"),
    ])
    .unwrap()
}

#[test]
fn test_registered_name_resolves_all_fields() {
    let err = CustomError::new(&registry(), "ERR_NAME_IS_EMPTY");
    assert_eq!(err.code, 10001);
    assert_eq!(err.code_name, "ERR_NAME_IS_EMPTY");
    assert_eq!(err.http_status, 400);
    assert_eq!(err.message, "Input name is empty");
}

#[test]
fn test_is_success() {
    assert!(registry().raise("SUCCESS").is_success());
}

#[test]
fn test_is_exception_for_unknown_name() {
    let err = registry().raise("I am not defined");
    assert!(err.is_exception());
    assert_eq!(err.code, 99999);
    assert_eq!(err.code_name, "ERR_OTHERS");
    assert_eq!(err.http_status, 500);
}

#[test]
fn test_fields_are_resolved_at_construction() {
    let registry = registry();
    let err = registry.raise("ERR_NAME_IS_EMPTY");
    registry.clear_all_codes();
    assert_eq!(err.code, 10001);
}

#[test]
fn test_format_places_variables_into_message() {
    let msg_args: Vec<MessageArg> = vec!["xxxhand".into(), 100.into()];
    let mut err = CustomError::with_args(
        &registry(),
        "This is %s test for formating %i",
        msg_args,
    );
    err.format();
    assert_eq!(err.code, 99999);
    assert_eq!(err.code_name, "ERR_OTHERS");
    assert_eq!(err.http_status, 500);
    assert_eq!(err.message, "This is xxxhand test for formating 100");
}

#[test]
fn test_construction_does_not_format() {
    let err = registry().raise_with_args("ERR_TOO_LONG", vec!["name".into(), 20.into()]);
    assert_eq!(err.message, "Field %s exceeds %i chars");
    assert_eq!(err.formatted().message, "Field name exceeds 20 chars");
}

#[test]
fn test_format_without_args_is_noop() {
    let mut err = registry().raise("ERR_TOO_LONG");
    err.format();
    assert_eq!(err.message, "Field %s exceeds %i chars");
}

#[test]
fn test_from_error_wraps_foreign_error() {
    let err = CustomError::from_error(Error::internal("I am error"));
    assert_eq!(err.code, 99999);
    assert_eq!(err.code_name, "ERR_OTHERS");
    assert_eq!(err.http_status, 500);
    assert_eq!(err.message, "I am error");
}

#[test]
fn test_from_error_returns_coded_error_unchanged() {
    let original = registry().raise("ERR_NAME_IS_EMPTY");
    let err = CustomError::from_error(Error::from(original.clone()));
    assert_eq!(err, original);
}

#[test]
fn test_from_dyn_wraps_io_error() {
    let io = std::io::Error::other("disk on fire");
    let err = CustomError::from_dyn(&io);
    assert!(err.is_exception());
    assert_eq!(err.message, "disk on fire");
}

#[test]
fn test_display_is_message() {
    let err = registry().raise("ERR_NAME_IS_EMPTY");
    assert_eq!(err.to_string(), "Input name is empty");
    assert_eq!(Error::from(err).to_string(), "Input name is empty");
}

#[test]
fn test_to_result_carries_code_and_message() {
    let res = registry().raise("ERR_NAME_IS_EMPTY").to_result::<()>();
    assert!(!res.is_ok());
    assert_eq!(res.code, 10001);
    assert_eq!(res.message, "Input name is empty");
}
