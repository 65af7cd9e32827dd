//! Tests for the utility helpers

use ckit_domain::Error;
use ckit_domain::constants::{BASIC_CHARS, COMPLEX_CHARS, SALT_ROUNDS};
use ckit_infrastructure::constants::CHUNK_SIZE_ERROR_MSG;
use ckit_infrastructure::utils::{
    from_base64_to_string, from_string_to_base64, get_lang_or_default,
    make_complex_random_string, make_random_numbers, make_random_string, make_uuid, sleep,
    split_array,
};
use std::time::Duration;

#[test]
fn test_split_array_chunks() {
    let items: Vec<i32> = (1..=10).collect();
    assert_eq!(
        split_array(&items, 3).unwrap(),
        vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9], vec![10]]
    );
    assert_eq!(split_array(&items, 10).unwrap(), vec![items.clone()]);
    assert_eq!(split_array(&items, 50).unwrap(), vec![items]);
}

#[test]
fn test_split_array_empty_input() {
    let empty: [u8; 0] = [];
    assert!(split_array(&empty, 3).unwrap().is_empty());
}

#[test]
fn test_split_array_zero_chunk_size() {
    let err = split_array(&[1, 2], 0).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert!(err.to_string().contains(CHUNK_SIZE_ERROR_MSG));
}

#[test]
fn test_lang_negotiation() {
    assert_eq!(
        get_lang_or_default(Some("zh-TW,zh;q=0.9,en-US;q=0.8,en;q=0.7"), "dev"),
        "zh-TW"
    );
    assert_eq!(get_lang_or_default(Some("*,zh-TW"), "dev"), "zh-TW");
    assert_eq!(get_lang_or_default(None, "dev"), "dev");
    assert_eq!(get_lang_or_default(Some(""), "dev"), "dev");
    assert_eq!(get_lang_or_default(Some("*"), "dev"), "dev");
}

#[test]
fn test_lang_negotiation_prefers_weight_over_order() {
    assert_eq!(get_lang_or_default(Some("en;q=0.5,ja;q=0.8"), "dev"), "ja");
    assert_eq!(get_lang_or_default(Some("fr;q=abc,de;q=0.9"), "dev"), "fr");
    assert_eq!(get_lang_or_default(Some("en,ja"), "dev"), "en");
}

#[test]
fn test_base64_round_trip_printable_ascii() {
    let printable: String = (0x20u8..0x7f).map(char::from).collect();
    for end in 0..=printable.len() {
        let s = &printable[..end];
        assert_eq!(from_base64_to_string(&from_string_to_base64(s)).unwrap(), s);
    }
    assert_eq!(from_string_to_base64("hello"), "aGVsbG8=");
}

#[test]
fn test_base64_decode_errors() {
    assert!(matches!(
        from_base64_to_string("not base64!"),
        Err(Error::Base64(_))
    ));
    // 0xFF 0xFE is not UTF-8
    assert!(matches!(from_base64_to_string("//4="), Err(Error::Utf8(_))));
}

#[test]
fn test_random_helpers() {
    let digits = make_random_numbers(None);
    assert_eq!(digits.len(), SALT_ROUNDS);
    assert!(digits.chars().all(|c| c.is_ascii_digit()));

    let basic = make_random_string(Some(64));
    assert_eq!(basic.len(), 64);
    assert!(basic.chars().all(|c| BASIC_CHARS.contains(c)));

    let complex = make_complex_random_string(Some(128));
    assert_eq!(complex.len(), 128);
    assert!(complex.chars().all(|c| COMPLEX_CHARS.contains(c)));

    assert!(make_random_string(Some(0)).is_empty());
}

#[test]
fn test_uuid_shape() {
    let id = make_uuid();
    let parsed = uuid::Uuid::parse_str(&id).unwrap();
    assert_eq!(parsed.get_version_num(), 4);
    assert_ne!(make_uuid(), id);
}

#[tokio::test(start_paused = true)]
async fn test_sleep_waits_whole_seconds() {
    let started = tokio::time::Instant::now();
    sleep(2).await;
    assert!(started.elapsed() >= Duration::from_secs(2));
}
