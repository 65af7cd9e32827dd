//! Request description for [`HttpClient`](super::HttpClient)

use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::constants::HTTP_DEFAULT_TIMEOUT_SECS;

/// A file part for multipart uploads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name sent with the part
    pub file_name: String,
    /// File content
    pub content: Vec<u8>,
}

/// Target, headers, parameters and attachments of one request
///
/// Built by value:
///
/// ```ignore
/// let opt = HttpOption::new()
///     .target_url("https://api.example.com/users")
///     .add_header("Authorization", "Bearer abc")
///     .add_parameter("name", "xxxhand")
///     .use_timeout_in_seconds(5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HttpOption {
    url: String,
    headers: BTreeMap<String, String>,
    parameters: BTreeMap<String, Value>,
    attachments: BTreeMap<String, Attachment>,
    use_custom_result: bool,
    timeout: Duration,
}

impl Default for HttpOption {
    fn default() -> Self {
        Self {
            url: String::new(),
            headers: BTreeMap::new(),
            parameters: BTreeMap::new(),
            attachments: BTreeMap::new(),
            use_custom_result: true,
            timeout: Duration::from_secs(HTTP_DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl HttpOption {
    /// Empty option with the default timeout, answering with envelopes
    pub fn new() -> Self {
        Self::default()
    }

    /// Target URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request headers
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Body, query or form parameters
    pub fn parameters(&self) -> &BTreeMap<String, Value> {
        &self.parameters
    }

    /// Multipart file parts keyed by field name
    pub fn attachments(&self) -> &BTreeMap<String, Attachment> {
        &self.attachments
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Set the target URL
    #[must_use]
    pub fn target_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set a header, replacing any previous value
    #[must_use]
    pub fn add_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set a parameter, replacing any previous value
    ///
    /// Structured values go through `serde_json::json!` or
    /// `serde_json::to_value` first.
    #[must_use]
    pub fn add_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Attach a file under the multipart field `name`
    #[must_use]
    pub fn add_attachment(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        self.attachments.insert(
            name.into(),
            Attachment {
                file_name: file_name.into(),
                content: content.into(),
            },
        );
        self
    }

    /// Answer with the bare response body instead of an envelope on success
    #[must_use]
    pub fn non_use_custom_result(mut self) -> Self {
        self.use_custom_result = false;
        self
    }

    /// Set the request timeout in seconds
    #[must_use]
    pub fn use_timeout_in_seconds(mut self, seconds: u64) -> Self {
        self.timeout = Duration::from_secs(seconds);
        self
    }

    /// Drop url, headers, parameters and attachments, keeping timeout and envelope flag
    #[must_use]
    pub fn clear(self) -> Self {
        Self {
            use_custom_result: self.use_custom_result,
            timeout: self.timeout,
            ..Self::default()
        }
    }

    /// Whether any header is set
    pub fn is_not_empty_headers(&self) -> bool {
        !self.headers.is_empty()
    }

    /// Whether any parameter is set
    pub fn is_not_empty_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Whether any attachment is set
    pub fn is_not_empty_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Whether successful responses are wrapped in an envelope
    pub fn is_use_custom_result(&self) -> bool {
        self.use_custom_result
    }

    /// Parameters flattened to text for query strings, forms and multipart
    ///
    /// Strings are used as-is; other values use their JSON text.
    pub(crate) fn text_parameters(&self) -> Vec<(String, String)> {
        self.parameters
            .iter()
            .map(|(k, v)| {
                let text = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), text)
            })
            .collect()
    }
}
