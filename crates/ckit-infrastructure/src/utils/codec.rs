//! Base64 helpers

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ckit_domain::error::Result;

/// Encode UTF-8 text as standard base64
pub fn from_string_to_base64(s: &str) -> String {
    STANDARD.encode(s)
}

/// Decode standard base64 into UTF-8 text
pub fn from_base64_to_string(encoded: &str) -> Result<String> {
    let bytes = STANDARD.decode(encoded)?;
    Ok(String::from_utf8(bytes)?)
}
