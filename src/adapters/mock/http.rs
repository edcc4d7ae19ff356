//! Mock HTTP client for testing.
//!
//! Provides a scripted HTTP client that returns predefined responses or
//! errors and records every request for later verification.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::auth::headers::{ACCESS_TOKEN, CLIENT, EXPIRY, TOKEN_TYPE, UID};
use crate::auth::Credential;
use crate::traits::{Headers, HttpClient, HttpError, Multipart, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET, POST or DELETE)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for plain POST requests)
    pub body: Option<String>,
    /// Form (for multipart POST requests)
    pub form: Option<Multipart>,
    /// Timeout requested by the caller
    pub timeout: Option<Duration>,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Success(Response),
    /// Return a transport error
    Error(HttpError),
}

impl MockResponse {
    /// A response with the given status and raw body.
    pub fn json(status: u16, body: &str) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(body.to_string())))
    }

    /// A response carrying the rotation headers for `credential`.
    pub fn rotation(status: u16, credential: &Credential, body: &str) -> Self {
        MockResponse::Success(Self::rotation_response(status, credential, body))
    }

    /// The [`Response`] behind [`MockResponse::rotation`], for tests that
    /// need to tamper with the headers.
    pub fn rotation_response(status: u16, credential: &Credential, body: &str) -> Response {
        let mut headers = Headers::new();
        headers.insert(UID.to_string(), credential.uid.clone());
        headers.insert(ACCESS_TOKEN.to_string(), credential.access_token.clone());
        headers.insert(CLIENT.to_string(), credential.client.clone());
        headers.insert(EXPIRY.to_string(), credential.expiry.clone());
        headers.insert(TOKEN_TYPE.to_string(), credential.token_type.clone());
        Response::with_headers(status, headers, Bytes::from(body.to_string()))
    }
}

/// Mock HTTP client for testing.
///
/// Responses are looked up in this order:
/// 1. one-shot responses queued with [`MockHttpClient::push_response`] for the method and URL
/// 2. a response set for the method and URL
/// 3. a response set for the URL (any method)
/// 4. the default response
///
/// # Example
///
/// ```ignore
/// use killstreaks::adapters::mock::{MockHttpClient, http::MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_method_response("GET", "http://ks.test/api/v1/syncs", MockResponse::json(200, "[]"));
///
/// let response = client.get("http://ks.test/api/v1/syncs", &Headers::new()).await?;
/// assert_eq!(response.status, 200);
/// assert_eq!(client.get_requests().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    /// One-shot responses by (method, URL)
    queued: Arc<Mutex<HashMap<(String, String), VecDeque<MockResponse>>>>,
    /// Configured responses by (method, URL)
    method_responses: Arc<Mutex<HashMap<(String, String), MockResponse>>>,
    /// Configured responses by URL
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self {
            queued: Arc::new(Mutex::new(HashMap::new())),
            method_responses: Arc::new(Mutex::new(HashMap::new())),
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a response for a URL, regardless of method.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    /// Set a response for a specific method and URL.
    pub fn set_method_response(&self, method: &str, url: &str, response: MockResponse) {
        self.method_responses
            .lock()
            .unwrap()
            .insert((method.to_string(), url.to_string()), response);
    }

    /// Queue a response that is returned once, before any configured one.
    pub fn push_response(&self, method: &str, url: &str, response: MockResponse) {
        self.queued
            .lock()
            .unwrap()
            .entry((method.to_string(), url.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: RecordedRequest) {
        self.requests.lock().unwrap().push(request);
    }

    fn respond(&self, method: &str, url: &str) -> Result<Response, HttpError> {
        let key = (method.to_string(), url.to_string());

        let queued = self
            .queued
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front);

        let configured = queued
            .or_else(|| self.method_responses.lock().unwrap().get(&key).cloned())
            .or_else(|| self.responses.lock().unwrap().get(url).cloned())
            .or_else(|| self.default_response.lock().unwrap().clone());

        match configured {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!(
                "No mock response for {} {}",
                method, url
            ))),
        }
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record(RecordedRequest {
            method: "GET".to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: None,
            form: None,
            timeout: None,
        });
        self.respond("GET", url)
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record(RecordedRequest {
            method: "POST".to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: Some(body.to_string()),
            form: None,
            timeout: None,
        });
        self.respond("POST", url)
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record(RecordedRequest {
            method: "DELETE".to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: None,
            form: None,
            timeout: None,
        });
        self.respond("DELETE", url)
    }

    async fn post_multipart(
        &self,
        url: &str,
        form: Multipart,
        headers: &Headers,
        timeout: Option<Duration>,
    ) -> Result<Response, HttpError> {
        self.record(RecordedRequest {
            method: "POST".to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: None,
            form: Some(form),
            timeout,
        });
        self.respond("POST", url)
    }
}
