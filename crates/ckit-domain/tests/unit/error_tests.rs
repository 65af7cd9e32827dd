//! Unit tests for domain error types

use ckit_domain::Error;

#[test]
fn test_invalid_argument_error() {
    let error = Error::invalid_argument("Invalid input provided");
    match error {
        Error::InvalidArgument { message } => assert_eq!(message, "Invalid input provided"),
        _ => panic!("Expected InvalidArgument error"),
    }
}

#[test]
fn test_messaging_error_with_source() {
    let error = Error::messaging_with_source("publish failed", std::io::Error::other("eof"));
    match &error {
        Error::Messaging { message, source } => {
            assert_eq!(message, "publish failed");
            assert!(source.is_some());
        }
        _ => panic!("Expected Messaging error"),
    }
    assert_eq!(error.to_string(), "Messaging error: publish failed");
}

#[test]
fn test_detail_strips_category() {
    assert_eq!(Error::config("missing key").detail(), "missing key");
    assert_eq!(Error::internal("plain").detail(), "plain");
}

#[test]
fn test_from_io_error() {
    let error: Error = std::io::Error::other("boom").into();
    assert!(matches!(error, Error::IoSimple { .. }));
}
