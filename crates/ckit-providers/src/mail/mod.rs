//! Mail Clients
//!
//! | Client | Backend | Feature |
//! |--------|---------|---------|
//! | [`MailClient`] | SMTP | `mail-smtp` |
//!
//! [`SmtpOptions`] and [`SendOptions`] are always available so
//! configuration and messages can be described without the client compiled in.

#[cfg(feature = "mail-smtp")]
pub mod smtp;

#[cfg(feature = "mail-smtp")]
pub use self::smtp::{MailClient, compose_message};

use serde::{Deserialize, Serialize};

use crate::constants::SMTP_DEFAULT_PORT;

/// Lowest TLS version accepted from the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TlsMinVersion {
    /// TLS 1.2
    #[default]
    #[serde(rename = "TLSv1.2")]
    Tls12,
    /// TLS 1.3
    #[serde(rename = "TLSv1.3")]
    Tls13,
}

/// SMTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpOptions {
    /// Server host
    pub host: String,
    /// Server port; 465 uses implicit TLS, others upgrade with STARTTLS
    pub port: u16,
    /// User name; authentication is used only when it is set
    pub user: Option<String>,
    /// Password
    pub pass: Option<String>,
    /// Reject invalid server certificates
    pub reject_unauthorized: bool,
    /// Lowest accepted TLS version
    pub tls_min_version: TlsMinVersion,
}

impl Default for SmtpOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: SMTP_DEFAULT_PORT,
            user: None,
            pass: None,
            reject_unauthorized: true,
            tls_min_version: TlsMinVersion::default(),
        }
    }
}

impl SmtpOptions {
    /// Whether the connection starts with TLS instead of upgrading
    pub fn implicit_tls(&self) -> bool {
        self.port == 465
    }

    /// User name, unless unset or blank
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref().filter(|u| !u.trim().is_empty())
    }
}

/// A file attached to a mail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAttachment {
    /// File name shown to the recipient
    pub file_name: String,
    /// MIME type, `application/octet-stream` when unset
    pub content_type: Option<String>,
    /// File content
    pub content: Vec<u8>,
}

/// One mail to send
///
/// Blank `sender`, `text` and `html` count as unset; the sender falls back
/// to `from`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Author address
    pub from: String,
    /// Transmitting address
    pub sender: Option<String>,
    /// Recipients
    pub to: Vec<String>,
    /// Carbon copies
    pub cc: Vec<String>,
    /// Blind carbon copies
    pub bcc: Vec<String>,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub text: Option<String>,
    /// HTML body
    pub html: Option<String>,
    /// Attachments
    pub attachments: Vec<MailAttachment>,
}
