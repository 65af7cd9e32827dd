//! Tests for EasyTranslator

use ckit_domain::Error;
use ckit_infrastructure::i18n::EasyTranslator;
use std::fs;
use tempfile::TempDir;

fn resources() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("en.json"),
        r#"{"HELLO": "Hello", "BYE": "Bye", "EMPTY": ""}"#,
    )
    .unwrap();
    fs::write(dir.path().join("zh-TW.json"), r#"{"HELLO": "你好"}"#).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    dir
}

#[tokio::test]
async fn test_loads_every_json_file() {
    let dir = resources();
    let trs = EasyTranslator::new("[Translator]")
        .use_resources(dir.path())
        .use_fallback_lng("en")
        .initial()
        .await
        .unwrap();

    assert_eq!(trs.locales(), vec!["en".to_string(), "zh-tw".to_string()]);
    assert_eq!(trs.t("HELLO", Some("zh-TW")), "你好");
    assert_eq!(trs.t("HELLO", Some("en")), "Hello");
}

#[tokio::test]
async fn test_fallback_chain() {
    let dir = resources();
    let trs = EasyTranslator::new("[Translator]")
        .use_resources(dir.path())
        .use_fallback_lng("EN")
        .initial()
        .await
        .unwrap();

    // key missing in the requested locale
    assert_eq!(trs.t("BYE", Some("zh-tw")), "Bye");
    // unknown locale
    assert_eq!(trs.t("HELLO", Some("fr")), "Hello");
    // no locale
    assert_eq!(trs.t("HELLO", None), "Hello");
    // blank translation
    assert_eq!(trs.t("EMPTY", Some("en")), "EMPTY");
    // unknown key
    assert_eq!(trs.t("MISSING", Some("en")), "MISSING");
}

#[tokio::test]
async fn test_in_memory_dictionaries_need_no_resources() {
    let trs = EasyTranslator::new("[Translator]")
        .use_dictionary("dev", [("GREETING", "hi")])
        .use_dictionary("JA", [("GREETING", "こんにちは")])
        .use_resources("")
        .initial()
        .await
        .unwrap();

    assert_eq!(trs.t("GREETING", Some("ja")), "こんにちは");
    assert_eq!(trs.t("GREETING", Some("de")), "hi");
}

#[tokio::test]
async fn test_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let err = EasyTranslator::new("[Translator]")
        .use_resources(dir.path().join("nope"))
        .initial()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert!(err.to_string().contains("The resources directory does not exist"));
}

#[tokio::test]
async fn test_file_path_is_not_a_directory() {
    let dir = resources();
    let err = EasyTranslator::new("[Translator]")
        .use_resources(dir.path().join("en.json"))
        .initial()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("is not a directory"));
}

#[tokio::test]
async fn test_directory_without_json_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("readme.md"), "# locales").unwrap();
    let err = EasyTranslator::new("[Translator]")
        .use_fallback_lng("en")
        .use_resources(dir.path())
        .initial()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("must have at least one file named en.json"));
}

#[tokio::test]
async fn test_malformed_json_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("en.json"), "{not json").unwrap();
    let err = EasyTranslator::new("[Translator]")
        .use_resources(dir.path())
        .initial()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Json { .. }));
}
