//! Mock implementations for testing.
//!
//! Provides a recording transport and a fixed-credential auth provider so
//! services can be exercised without network access.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::auth::AuthProvider;
use crate::errors::MailgunError;
use crate::transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MultipartPart, MultipartRequest,
    TransportError,
};

/// Mock HTTP transport for testing.
pub struct MockTransport {
    outcomes: Mutex<VecDeque<MockOutcome>>,
    requests: Mutex<Vec<RecordedRequest>>,
    default_response: Mutex<Option<MockResponse>>,
}

enum MockOutcome {
    Response(MockResponse),
    Failure(TransportError),
}

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path, including any query string.
    pub path: String,
    /// Request body, for plain requests.
    pub body: Option<Vec<u8>>,
    /// Form parts, for multipart requests.
    pub parts: Option<Vec<MultipartPart>>,
    /// Request headers.
    pub headers: HashMap<String, String>,
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Creates a successful JSON response.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        Self {
            status: 200,
            headers,
            body,
        }
    }

    /// Creates a plain text response with the given status.
    pub fn text(status: u16, body: &str) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "text/plain".to_string());

        Self {
            status,
            headers,
            body: body.as_bytes().to_vec(),
        }
    }

    /// Creates a provider-style JSON error response.
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(&serde_json::json!({ "message": message })).with_status(status)
    }

    /// Creates a response with custom status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            default_response: Mutex::new(None),
        }
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        lock(&self.outcomes).push_back(MockOutcome::Response(response));
    }

    /// Queues a JSON response.
    pub fn queue_json<T: serde::Serialize>(&self, value: &T) {
        self.queue(MockResponse::json(value));
    }

    /// Queues an error response.
    pub fn queue_error(&self, status: u16, message: &str) {
        self.queue(MockResponse::error(status, message));
    }

    /// Makes the next call fail as if the request timed out.
    pub fn fail_next_with_timeout(&self) {
        lock(&self.outcomes).push_back(MockOutcome::Failure(TransportError::Timeout {
            timeout: Duration::from_secs(30),
        }));
    }

    /// Makes the next call fail as if the connection was refused.
    pub fn fail_next_with_connection_error(&self, message: &str) {
        lock(&self.outcomes).push_back(MockOutcome::Failure(TransportError::Connection {
            message: message.to_string(),
        }));
    }

    /// Sets the response used once the queue is empty.
    pub fn set_default(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Clears recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    fn next_outcome(&self) -> Result<HttpResponse, TransportError> {
        let outcome = lock(&self.outcomes).pop_front();
        let response = match outcome {
            Some(MockOutcome::Response(response)) => response,
            Some(MockOutcome::Failure(error)) => return Err(error),
            None => lock(&self.default_response)
                .clone()
                .unwrap_or_else(|| MockResponse::error(500, "No mock response configured")),
        };

        Ok(HttpResponse {
            status: response.status,
            headers: response.headers,
            body: response.body,
        })
    }

    fn record(&self, request: RecordedRequest) {
        lock(&self.requests).push(request);
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.record(RecordedRequest {
            method: request.method,
            path: request.path,
            body: request.body,
            parts: None,
            headers: request.headers,
        });

        self.next_outcome()
    }

    async fn send_multipart(
        &self,
        request: MultipartRequest,
    ) -> Result<HttpResponse, TransportError> {
        self.record(RecordedRequest {
            method: HttpMethod::Post,
            path: request.path,
            body: None,
            parts: Some(request.parts),
            headers: request.headers,
        });

        self.next_outcome()
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("request_count", &self.request_count())
            .finish()
    }
}

/// Mock auth provider for testing.
pub struct MockAuth {
    credentials: String,
}

impl MockAuth {
    /// Creates a mock auth provider that sends `Basic <credentials>`.
    pub fn new(credentials: impl Into<String>) -> Self {
        Self {
            credentials: credentials.into(),
        }
    }
}

impl Default for MockAuth {
    fn default() -> Self {
        Self::new("mock-api-key")
    }
}

impl AuthProvider for MockAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            "Authorization".to_string(),
            format!("Basic {}", self.credentials),
        );
    }

    fn scheme(&self) -> &str {
        "Basic"
    }

    fn validate(&self) -> Result<(), MailgunError> {
        Ok(())
    }
}

impl std::fmt::Debug for MockAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAuth").finish()
    }
}
