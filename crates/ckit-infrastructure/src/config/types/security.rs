//! JWT and i18n configuration types

use crate::constants::JWT_ALGORITHM;
use ckit_domain::constants::{DEFAULT_EXPIRES_IN_SECONDS, DEFAULT_LANG};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// JSON Web Token configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Signing algorithm, only RS256 is accepted
    pub algorithm: String,
    /// Token lifetime in seconds
    pub expires_in_seconds: i64,
    /// PEM private key file
    pub private_key_path: Option<PathBuf>,
    /// Passphrase of an encrypted private key
    pub passphrase: Option<String>,
    /// PEM public key file
    pub public_key_path: Option<PathBuf>,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            algorithm: JWT_ALGORITHM.to_string(),
            expires_in_seconds: DEFAULT_EXPIRES_IN_SECONDS,
            private_key_path: None,
            passphrase: None,
            public_key_path: None,
        }
    }
}

/// Translator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Language used when negotiation yields nothing
    pub default_lang: String,
    /// Language consulted when a key is missing in the requested one
    pub fallback_lang: Option<String>,
    /// Directory holding `<locale>.json` dictionaries
    pub resources_path: Option<PathBuf>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_lang: DEFAULT_LANG.to_string(),
            fallback_lang: None,
            resources_path: None,
        }
    }
}
