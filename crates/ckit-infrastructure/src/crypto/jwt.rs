//! JSON Web Token service

use crate::config::JwtConfig;
use crate::error_ext::ErrorContext;
use chrono::Utc;
use ckit_domain::constants::DEFAULT_EXPIRES_IN_SECONDS;
use ckit_domain::error::{Error, Result};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use pkcs8::der::Document;
use pkcs8::{EncryptedPrivateKeyInfo, PrivateKeyInfo};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

const ENCRYPTED_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";

/// A PEM private key and its optional passphrase
#[derive(Clone, Default)]
pub struct PrivateKeyStruct {
    /// PEM text
    pub key: String,
    /// Passphrase for an encrypted key
    pub passphrase: Option<String>,
}

impl PrivateKeyStruct {
    /// An unencrypted key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            passphrase: None,
        }
    }

    /// An encrypted key and its passphrase
    pub fn with_passphrase(key: impl Into<String>, passphrase: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            passphrase: Some(passphrase.into()),
        }
    }

    fn encoding_key(&self) -> Result<EncodingKey> {
        let (label, document) =
            Document::from_pem(&self.key).auth_context("Failed to parse private key PEM")?;
        if label != ENCRYPTED_KEY_LABEL {
            return EncodingKey::from_rsa_pem(self.key.as_bytes())
                .auth_context("Failed to load private key");
        }

        let passphrase = self
            .passphrase
            .as_deref()
            .ok_or_else(|| Error::authentication("Passphrase required for encrypted key"))?;
        let encrypted = EncryptedPrivateKeyInfo::try_from(document.as_bytes())
            .auth_context("Failed to parse encrypted private key")?;
        let decrypted = encrypted
            .decrypt(passphrase)
            .auth_context("Failed to decrypt private key")?;
        let info = PrivateKeyInfo::try_from(decrypted.as_bytes())
            .auth_context("Failed to parse decrypted private key")?;
        Ok(EncodingKey::from_rsa_der(info.private_key))
    }
}

impl std::fmt::Debug for PrivateKeyStruct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKeyStruct")
            .field("key", &"<redacted>")
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Signs and verifies RS256 tokens
#[derive(Debug, Clone)]
pub struct JwtService {
    default_expires_in: i64,
}

impl Default for JwtService {
    fn default() -> Self {
        Self {
            default_expires_in: DEFAULT_EXPIRES_IN_SECONDS,
        }
    }
}

impl JwtService {
    /// Service with a one hour default lifetime
    pub fn new() -> Self {
        Self::default()
    }

    /// Service using the configured default lifetime
    pub fn from_config(config: &JwtConfig) -> Self {
        Self {
            default_expires_in: config.expires_in_seconds,
        }
    }

    /// Read the configured private key files
    pub fn load_private_key(config: &JwtConfig) -> Result<PrivateKeyStruct> {
        let path = config
            .private_key_path
            .as_ref()
            .ok_or_else(|| Error::configuration("JWT private key path is not set"))?;
        let key = std::fs::read_to_string(path)
            .io_context(format!("Failed to read private key {}", path.display()))?;
        Ok(PrivateKeyStruct {
            key,
            passphrase: config.passphrase.clone(),
        })
    }

    /// Read the configured public key file
    pub fn load_public_key(config: &JwtConfig) -> Result<String> {
        let path = config
            .public_key_path
            .as_ref()
            .ok_or_else(|| Error::configuration("JWT public key path is not set"))?;
        std::fs::read_to_string(path)
            .io_context(format!("Failed to read public key {}", path.display()))
    }

    /// Sign `payload` with RS256
    ///
    /// `iat` and `exp` are set on the payload object. `expires_in_seconds`
    /// defaults to the service lifetime and may be negative.
    pub fn make_json_web_token<P: Serialize>(
        &self,
        payload: &P,
        key: &PrivateKeyStruct,
        expires_in_seconds: Option<i64>,
    ) -> Result<String> {
        let mut claims = match serde_json::to_value(payload)? {
            Value::Object(map) => map,
            _ => return Err(Error::invalid_argument("JWT payload must be a JSON object")),
        };
        let now = Utc::now().timestamp();
        let expires_in = expires_in_seconds.unwrap_or(self.default_expires_in);
        claims.insert("iat".to_string(), Value::from(now));
        claims.insert("exp".to_string(), Value::from(now + expires_in));

        let encoding_key = key.encoding_key()?;
        encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .auth_context("Failed to sign token")
    }

    /// Verify `token` with a PEM public key and decode its payload
    ///
    /// Verification failures keep the `jsonwebtoken` error as message and
    /// source, so callers can inspect its kind (e.g. expired signature).
    pub fn verify_json_web_token<T: DeserializeOwned>(
        &self,
        token: &str,
        public_key: &str,
    ) -> Result<T> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key.as_bytes())
            .auth_context("Failed to load public key")?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = 0;
        validation.validate_aud = false;

        decode::<T>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| Error::Authentication {
                message: e.to_string(),
                source: Some(Box::new(e)),
            })
    }
}
