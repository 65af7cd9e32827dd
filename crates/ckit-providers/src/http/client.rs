//! Envelope-producing HTTP client

use ckit_domain::CustomResult;
use ckit_domain::error::{Error, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::{Map, Value, json};
use tracing::error;

use super::option::HttpOption;
use crate::constants::{HTTP_CLIENT_PREFIX, HTTP_TRANSPORT_ERROR_CODE};

/// Outcome of an [`HttpClient`] call
#[derive(Debug, Clone, PartialEq)]
pub enum HttpReply {
    /// Success or failure wrapped in a result envelope
    Envelope(CustomResult<Value>),
    /// Bare response body, only on success with the envelope turned off
    Raw(Value),
}

impl HttpReply {
    /// Whether the request succeeded
    pub fn is_ok(&self) -> bool {
        match self {
            Self::Envelope(res) => res.is_ok(),
            Self::Raw(_) => true,
        }
    }

    /// Response body, or error details for a failed request
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Envelope(res) => res.result.as_ref(),
            Self::Raw(value) => Some(value),
        }
    }

    /// The reply as an envelope, wrapping a raw body as a success
    pub fn into_envelope(self) -> CustomResult<Value> {
        match self {
            Self::Envelope(res) => res,
            Self::Raw(value) => CustomResult::new().with_result(value),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Encoding {
    Json,
    UrlEncoded,
    Query,
    Multipart,
}

/// HTTP client wrapping a pooled `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client with the default user agent
    pub fn new() -> Result<Self> {
        Self::with_user_agent(&format!("ckit/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Create a client sending `user_agent`
    pub fn with_user_agent(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Infrastructure {
                message: format!("Failed to create HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// POST the parameters as a JSON object
    pub async fn try_post_json(&self, opt: &HttpOption) -> HttpReply {
        self.send(Method::POST, opt, Encoding::Json).await
    }

    /// PATCH the parameters as a JSON object
    pub async fn try_patch_json(&self, opt: &HttpOption) -> HttpReply {
        self.send(Method::PATCH, opt, Encoding::Json).await
    }

    /// POST the parameters as `application/x-www-form-urlencoded`
    pub async fn try_post_url_encode(&self, opt: &HttpOption) -> HttpReply {
        self.send(Method::POST, opt, Encoding::UrlEncoded).await
    }

    /// GET with the parameters as the query string
    pub async fn try_get_json(&self, opt: &HttpOption) -> HttpReply {
        self.send(Method::GET, opt, Encoding::Query).await
    }

    /// POST parameters and attachments as `multipart/form-data`
    pub async fn try_post_form_data(&self, opt: &HttpOption) -> HttpReply {
        self.send(Method::POST, opt, Encoding::Multipart).await
    }

    fn prepare(&self, method: Method, opt: &HttpOption, encoding: Encoding) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, opt.url())
            .timeout(opt.timeout());
        for (key, value) in opt.headers() {
            builder = builder.header(key, value);
        }
        match encoding {
            Encoding::Json => {
                let body: Map<String, Value> = opt
                    .parameters()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                builder.json(&body)
            }
            Encoding::UrlEncoded => builder.form(&opt.text_parameters()),
            Encoding::Query if opt.is_not_empty_parameters() => {
                builder.query(&opt.text_parameters())
            }
            Encoding::Query => builder,
            Encoding::Multipart => {
                let mut form = Form::new();
                for (key, value) in opt.text_parameters() {
                    form = form.text(key, value);
                }
                for (name, attachment) in opt.attachments() {
                    let part = Part::bytes(attachment.content.clone())
                        .file_name(attachment.file_name.clone());
                    form = form.part(name.clone(), part);
                }
                builder.multipart(form)
            }
        }
    }

    async fn send(&self, method: Method, opt: &HttpOption, encoding: Encoding) -> HttpReply {
        let request = match self.prepare(method.clone(), opt, encoding).build() {
            Ok(request) => request,
            Err(e) => return transport_failure(&method, opt.url(), opt, &e),
        };
        let url = request.url().to_string();

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => return transport_failure(&method, &url, opt, &e),
        };
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return transport_failure(&method, &url, opt, &e),
        };
        let body = parse_body(&text);

        if status.is_success() {
            return if opt.is_use_custom_result() {
                HttpReply::Envelope(CustomResult::new().with_result(body))
            } else {
                HttpReply::Raw(body)
            };
        }

        let reason = format!("Request failed with status code {}", status.as_u16());
        if text.is_empty() {
            return transport_failure(&method, &url, opt, &reason);
        }
        error!("{HTTP_CLIENT_PREFIX} status: {}, data: {body}", status.as_u16());
        HttpReply::Envelope(
            CustomResult::new()
                .with_code(i32::from(status.as_u16()))
                .with_message(failure_message(&method, &url, &reason))
                .with_result(body),
        )
    }
}

fn failure_message(method: &Method, url: &str, reason: &dyn std::fmt::Display) -> String {
    format!("{HTTP_CLIENT_PREFIX} {method} {url} fail: {reason}")
}

/// A 499 envelope carrying a summary of the request that could not complete
fn transport_failure(
    method: &Method,
    url: &str,
    opt: &HttpOption,
    reason: &dyn std::fmt::Display,
) -> HttpReply {
    let message = failure_message(method, url, reason);
    error!("{message}");
    let summary = json!({
        "url": url,
        "method": method.as_str(),
        "headers": opt.headers(),
        "timeout": u64::try_from(opt.timeout().as_millis()).unwrap_or(u64::MAX),
        "data": opt.parameters(),
    });
    HttpReply::Envelope(
        CustomResult::new()
            .with_code(HTTP_TRANSPORT_ERROR_CODE)
            .with_message(message)
            .with_result(summary),
    )
}

/// JSON when possible, the raw text otherwise, `null` for an empty body
fn parse_body(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
