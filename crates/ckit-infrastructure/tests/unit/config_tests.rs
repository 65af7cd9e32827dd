//! Configuration loader tests
//!
//! Tests that mutate environment variables are ignored by default and must
//! run sequentially:
//!
//! ```bash
//! cargo test -p ckit-infrastructure --test unit config -- --test-threads=1 --ignored
//! ```

use ckit_domain::{Error, ErrorCode};
use ckit_infrastructure::config::{
    AppConfig, ConfigBuilder, ConfigLoader, HttpConfig, MqConfig, validate_app_config,
};
use ckit_infrastructure::constants::DEFAULT_LOG_LEVEL;
use ckit_providers::mail::TlsMinVersion;
use std::env;
use std::fs;
use tempfile::TempDir;

fn set_env(key: &str, value: &str) {
    // SAFETY: env tests run with --test-threads=1
    unsafe {
        env::set_var(key, value);
    }
}

fn remove_env(key: &str) {
    // SAFETY: env tests run with --test-threads=1
    unsafe {
        env::remove_var(key);
    }
}

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("ckit.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_defaults_are_valid() {
    let config = AppConfig::default();
    validate_app_config(&config).unwrap();
    assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
    assert_eq!(config.mq.heartbeat, 60);
    assert_eq!(config.mq.max_retries, 5);
    assert_eq!(config.mq.retry_interval_ms, 5000);
    assert_eq!(config.redis.port, 6379);
    assert_eq!(config.http.timeout_secs, 30);
    assert_eq!(config.jwt.algorithm, "RS256");
    assert_eq!(config.jwt.expires_in_seconds, 3600);
    assert_eq!(config.i18n.default_lang, "dev");
    assert!(config.error_codes.is_empty());
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[logging]
level = "debug"

[mq]
host = "rabbit.local"
port = 5673
max_retries = 2

[redis]
db = 4

[mongo]
uri = "mongodb://mongo.local:27017"
db = "shop"
user = "ada"

[mail]
host = "smtp.local"
port = 465
tls_min_version = "TLSv1.3"

[[error_codes]]
codeName = "ERR_NAME_IS_EMPTY"
code = 1001
httpStatus = 400
message = "Name is empty"
"#,
    );

    let config = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("CKIT_FILE_TEST")
        .load()
        .unwrap();

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.mq.host, "rabbit.local");
    assert_eq!(config.mq.port, 5673);
    assert_eq!(config.mq.max_retries, 2);
    assert_eq!(config.mq.retry_interval_ms, 5000);
    assert_eq!(config.redis.db, 4);
    assert_eq!(config.mongo.uri, "mongodb://mongo.local:27017");
    assert_eq!(config.mongo.db, "shop");
    assert_eq!(config.mongo.user.as_deref(), Some("ada"));
    assert_eq!(config.mongo.max_pool_size, 10);
    assert_eq!(config.mail.host, "smtp.local");
    assert!(config.mail.implicit_tls());
    assert_eq!(config.mail.tls_min_version, TlsMinVersion::Tls13);
    assert!(config.mail.reject_unauthorized);
    assert_eq!(
        config.error_codes,
        vec![ErrorCode::new("ERR_NAME_IS_EMPTY", 1001, 400, "Name is empty")]
    );
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let loader = ConfigLoader::new()
        .with_config_path(dir.path().join("absent.toml"))
        .with_env_prefix("CKIT_ABSENT_TEST");
    assert_eq!(loader.load().unwrap(), AppConfig::default());
    assert!(loader.config_path().is_some());
}

#[test]
fn test_invalid_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[mq]\nport = 0\n");
    let err = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("CKIT_INVALID_TEST")
        .load()
        .unwrap_err();
    assert!(err.to_string().contains("MQ port cannot be 0"));
}

#[test]
fn test_malformed_file_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[mq\nport = ");
    let err = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("CKIT_MALFORMED_TEST")
        .load()
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_validation_rules() {
    let mut config = AppConfig::default();
    config.logging.level = "loud".into();
    assert!(validate_app_config(&config).is_err());

    let mut config = AppConfig::default();
    config.mq.retry_interval_ms = 0;
    assert!(validate_app_config(&config).is_err());

    let mut config = AppConfig::default();
    config.http.timeout_secs = 0;
    assert!(validate_app_config(&config).is_err());

    let mut config = AppConfig::default();
    config.jwt.algorithm = "HS256".into();
    let err = validate_app_config(&config).unwrap_err();
    assert!(err.to_string().contains("Only RS256 is supported"));

    let mut config = AppConfig::default();
    config.error_codes.push(ErrorCode::new("", 1, 400, "blank"));
    assert!(validate_app_config(&config).is_err());
}

#[test]
fn test_builder_validates() {
    let config = ConfigBuilder::new()
        .with_mq(MqConfig {
            host: "mq.internal".into(),
            ..MqConfig::default()
        })
        .with_error_codes(vec![ErrorCode::new("ERR_A", 1, 400, "A")])
        .build()
        .unwrap();
    assert_eq!(config.mq.host, "mq.internal");
    assert_eq!(config.error_codes.len(), 1);

    let result = ConfigBuilder::new()
        .with_http(HttpConfig {
            timeout_secs: 0,
            ..HttpConfig::default()
        })
        .build();
    assert!(result.is_err());
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.toml");
    let original = ConfigBuilder::new()
        .with_mq(MqConfig {
            vhost: "/orders".into(),
            retry_interval_ms: 250,
            ..MqConfig::default()
        })
        .with_error_codes(vec![ErrorCode::new("ERR_B", 2, 404, "B %s")])
        .build()
        .unwrap();

    let loader = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("CKIT_SAVE_TEST");
    loader.save_to_file(&original, &path).unwrap();
    assert_eq!(loader.load().unwrap(), original);
}

#[test]
#[ignore = "requires --test-threads=1 due to env var mutations"]
fn test_env_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[mq]\nhost = \"from-file\"\n");
    set_env("CKIT_MQ__HOST", "from-env");
    set_env("CKIT_HTTP__TIMEOUT_SECS", "12");

    let config = ConfigLoader::new().with_config_path(&path).load();

    remove_env("CKIT_MQ__HOST");
    remove_env("CKIT_HTTP__TIMEOUT_SECS");
    let config = config.unwrap();
    assert_eq!(config.mq.host, "from-env");
    assert_eq!(config.http.timeout_secs, 12);
}
