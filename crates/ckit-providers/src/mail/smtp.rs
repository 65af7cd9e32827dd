//! SMTP mail client over a pooled lettre transport

use ckit_domain::error::{Error, Result};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::PoolConfig;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters, TlsVersion};
use lettre::transport::smtp::response::Response;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::{Arc, RwLock};
use tracing::{error, info};

use super::{SendOptions, SmtpOptions, TlsMinVersion};
use crate::constants::{MAIL_CLIENT_PREFIX, MAIL_DEFAULT_CONTENT_TYPE};

type Transport = AsyncSmtpTransport<Tokio1Executor>;

/// SMTP client; call [`MailClient::initial_smtp_pool`] before sending
#[derive(Default)]
pub struct MailClient {
    transport: RwLock<Option<Arc<Transport>>>,
}

impl MailClient {
    /// Client without a transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the pooled transport from `options`
    pub fn initial_smtp_pool(&self, options: &SmtpOptions) -> Result<()> {
        let tls = TlsParameters::builder(options.host.clone())
            .dangerous_accept_invalid_certs(!options.reject_unauthorized)
            .set_min_tls_version(match options.tls_min_version {
                TlsMinVersion::Tls12 => TlsVersion::Tlsv12,
                TlsMinVersion::Tls13 => TlsVersion::Tlsv13,
            })
            .build()
            .map_err(|e| {
                Error::configuration_with_source(format!("{MAIL_CLIENT_PREFIX} Invalid TLS settings"), e)
            })?;
        let tls = if options.implicit_tls() {
            Tls::Wrapper(tls)
        } else {
            Tls::Opportunistic(tls)
        };

        let mut builder = Transport::builder_dangerous(options.host.as_str())
            .port(options.port)
            .tls(tls)
            .pool_config(PoolConfig::new());
        if let Some(user) = options.user() {
            builder = builder.credentials(Credentials::new(
                user.to_string(),
                options.pass.clone().unwrap_or_default(),
            ));
        }

        let mut slot = self
            .transport
            .write()
            .map_err(|_| Error::internal("Mail client lock poisoned"))?;
        *slot = Some(Arc::new(builder.build()));
        info!("{MAIL_CLIENT_PREFIX} Initial mail client done");
        Ok(())
    }

    /// Whether a transport was built
    pub fn is_initialized(&self) -> bool {
        self.transport().is_ok()
    }

    /// Open a connection to check the server settings
    pub async fn try_verify(&self) -> Result<bool> {
        let transport = self.transport()?;
        transport.test_connection().await.map_err(|e| {
            error!("{MAIL_CLIENT_PREFIX} Verify failed: {e}");
            Error::network_with_source(format!("{MAIL_CLIENT_PREFIX} Verify failed: {e}"), e)
        })
    }

    /// Send one mail
    pub async fn send(&self, options: &SendOptions) -> Result<Response> {
        let transport = self.transport()?;
        let message = compose_message(options)?;
        transport.send(message).await.map_err(|e| {
            error!("{MAIL_CLIENT_PREFIX} Send failed: {e}");
            Error::network_with_source(format!("{MAIL_CLIENT_PREFIX} Send failed: {e}"), e)
        })
    }

    fn transport(&self) -> Result<Arc<Transport>> {
        self.transport
            .read()
            .ok()
            .and_then(|slot| slot.clone())
            .ok_or_else(|| {
                Error::invalid_state(format!("{MAIL_CLIENT_PREFIX} Mailer instance not initialized"))
            })
    }
}

impl std::fmt::Debug for MailClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailClient")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Build the MIME message for `options`
///
/// Text and HTML become alternatives when both are set. Attachments wrap the
/// body in a mixed part.
pub fn compose_message(options: &SendOptions) -> Result<Message> {
    let from = mailbox(&options.from)?;
    let sender = match non_blank(options.sender.as_deref()) {
        Some(sender) => mailbox(sender)?,
        None => from.clone(),
    };

    let mut builder = Message::builder()
        .from(from)
        .sender(sender)
        .subject(options.subject.as_str());
    for to in &options.to {
        builder = builder.to(mailbox(to)?);
    }
    for cc in &options.cc {
        builder = builder.cc(mailbox(cc)?);
    }
    for bcc in &options.bcc {
        builder = builder.bcc(mailbox(bcc)?);
    }

    let text = non_blank(options.text.as_deref()).map(str::to_string);
    let html = non_blank(options.html.as_deref()).map(str::to_string);
    let content = match (text, html) {
        (Some(text), Some(html)) => MultiPart::alternative_plain_html(text, html),
        (None, Some(html)) => MultiPart::mixed().singlepart(SinglePart::html(html)),
        (text, None) => MultiPart::mixed().singlepart(SinglePart::plain(text.unwrap_or_default())),
    };

    let body = if options.attachments.is_empty() {
        content
    } else {
        let mut mixed = MultiPart::mixed().multipart(content);
        for attachment in &options.attachments {
            let content_type = attachment
                .content_type
                .as_deref()
                .and_then(|ct| non_blank(Some(ct)))
                .unwrap_or(MAIL_DEFAULT_CONTENT_TYPE);
            let content_type = ContentType::parse(content_type).map_err(|e| {
                Error::invalid_argument(format!(
                    "{MAIL_CLIENT_PREFIX} Invalid content type {content_type}: {e}"
                ))
            })?;
            mixed = mixed.singlepart(
                Attachment::new(attachment.file_name.clone())
                    .body(attachment.content.clone(), content_type),
            );
        }
        mixed
    };

    builder
        .multipart(body)
        .map_err(|e| Error::invalid_argument(format!("{MAIL_CLIENT_PREFIX} Invalid mail: {e}")))
}

fn mailbox(address: &str) -> Result<Mailbox> {
    address.parse().map_err(|e| {
        Error::invalid_argument(format!("{MAIL_CLIENT_PREFIX} Invalid address {address}: {e}"))
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
