//! HTTP client trait abstraction.
//!
//! Provides a trait-based abstraction for the HTTP operations the session and
//! sync layers perform, enabling dependency injection and mocking in tests.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::time::Duration;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// HTTP response wrapper.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, body: Bytes) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    /// Create a new response with headers.
    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Look up a response header by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Get the response body as a string.
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }

    /// Parse the response body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Parse the body as a JSON value, falling back to a JSON string holding
    /// the raw text when the body is not JSON.
    pub fn json_or_text(&self) -> serde_json::Value {
        self.json::<serde_json::Value>().unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&self.body).into_owned())
        })
    }
}

/// A file part of a multipart upload.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    /// Form field name
    pub field: String,
    /// File name sent in the part's content disposition
    pub file_name: String,
    /// MIME type of the part
    pub content_type: String,
    /// Raw part contents
    pub bytes: Bytes,
}

/// A multipart/form-data request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Multipart {
    /// Plain text fields, in insertion order
    pub fields: Vec<(String, String)>,
    /// File parts, in insertion order
    pub files: Vec<FilePart>,
}

impl Multipart {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    pub fn text(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((field.into(), value.into()));
        self
    }

    /// Add a file part.
    pub fn file(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        self.files.push(FilePart {
            field: field.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        });
        self
    }

    /// Get a text field by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Get a file part by field name.
    pub fn file_part(&self, name: &str) -> Option<&FilePart> {
        self.files.iter().find(|part| part.field == name)
    }
}

/// HTTP client errors.
#[derive(Debug, Clone)]
pub enum HttpError {
    /// Connection failed
    ConnectionFailed(String),
    /// Request timeout
    Timeout(String),
    /// Invalid URL
    InvalidUrl(String),
    /// Request could not be built (bad header, bad MIME type)
    InvalidRequest(String),
    /// Other error
    Other(String),
}

impl HttpError {
    /// Whether this error happened at the transport level, before any
    /// response was received.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, HttpError::ConnectionFailed(_) | HttpError::Timeout(_))
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for HTTP client operations.
///
/// Implementations include the production reqwest-based client and a
/// scripted mock for tests. Non-2xx statuses are returned as `Ok(Response)`;
/// only transport failures are `Err`, so callers can branch on status codes.
///
/// # Example
///
/// ```ignore
/// use killstreaks::traits::{HttpClient, Headers, HttpError};
///
/// async fn fetch<C: HttpClient + ?Sized>(client: &C) -> Result<u16, HttpError> {
///     let response = client.get("https://api.example.com/api/v1/syncs", &Headers::new()).await?;
///     Ok(response.status)
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request.
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// Perform a POST request with a string body.
    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// Perform a DELETE request.
    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// Perform a multipart POST request.
    ///
    /// `timeout` bounds the whole exchange when set; otherwise the client's
    /// default timeout behavior applies.
    async fn post_multipart(
        &self,
        url: &str,
        form: Multipart,
        headers: &Headers,
        timeout: Option<Duration>,
    ) -> Result<Response, HttpError>;
}
