//! HTTP transport implementation.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use std::collections::HashMap;
use std::time::Duration;
use tracing::instrument;

use super::{MultipartPart, MultipartRequest, TransportError};

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request.
    Get,
    /// POST request.
    Post,
}

/// HTTP request representation.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path, optionally carrying a query string.
    pub path: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Request timeout override.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Creates a new GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Creates a new POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Raw HTTP response, returned to callers without interpretation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true if the status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parses the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// HTTP transport trait.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Send a multipart form request.
    async fn send_multipart(
        &self,
        request: MultipartRequest,
    ) -> Result<HttpResponse, TransportError>;
}

/// HTTP transport implementation using reqwest.
pub struct HttpTransportImpl {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransportImpl {
    /// Creates a new HTTP transport.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, TransportError> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(user_agent)
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| TransportError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    /// Builds the full URL for a path.
    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn map_error(&self, error: &reqwest::Error, timeout: Option<Duration>) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout {
                timeout: timeout.unwrap_or(self.timeout),
            }
        } else if error.is_connect() {
            TransportError::Connection {
                message: error.to_string(),
            }
        } else {
            TransportError::InvalidResponse {
                message: error.to_string(),
            }
        }
    }

    async fn execute(
        &self,
        mut req_builder: RequestBuilder,
        headers: &HashMap<String, String>,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse, TransportError> {
        for (name, value) in headers {
            req_builder = req_builder.header(name, value);
        }

        if let Some(timeout) = timeout {
            req_builder = req_builder.timeout(timeout);
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| self.map_error(&e, timeout))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_error(&e, timeout))?
            .to_vec();

        tracing::debug!(status, body_len = body.len(), "Received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for HttpTransportImpl {
    #[instrument(skip(self, request), fields(method = ?request.method, path = %request.path))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.build_url(&request.path);

        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        self.execute(req_builder, &request.headers, request.timeout)
            .await
    }

    #[instrument(skip(self, request), fields(path = %request.path, parts = request.parts.len()))]
    async fn send_multipart(
        &self,
        request: MultipartRequest,
    ) -> Result<HttpResponse, TransportError> {
        let url = self.build_url(&request.path);

        let mut form = reqwest::multipart::Form::new();

        for part in request.parts {
            form = match part {
                MultipartPart::Text { name, value } => form.text(name, value),
                MultipartPart::File {
                    name,
                    filename,
                    content_type,
                    data,
                } => {
                    let part = reqwest::multipart::Part::bytes(data)
                        .file_name(filename)
                        .mime_str(&content_type)
                        .map_err(|e| TransportError::InvalidRequest {
                            message: e.to_string(),
                        })?;
                    form.part(name, part)
                }
            };
        }

        let req_builder = self.client.post(&url).multipart(form);

        self.execute(req_builder, &request.headers, request.timeout)
            .await
    }
}

impl std::fmt::Debug for HttpTransportImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransportImpl")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_trims_leading_slash() {
        let transport = HttpTransportImpl::new(
            "https://api.mailgun.net/v3",
            Duration::from_secs(30),
            Duration::from_secs(10),
            "test-agent",
        )
        .unwrap();

        assert_eq!(
            transport.build_url("/mg.example.com/messages"),
            "https://api.mailgun.net/v3/mg.example.com/messages"
        );
    }

    #[test]
    fn test_http_response_helpers() {
        let response = HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: br#"{"id":"<1@mg.example.com>","message":"Queued. Thank you."}"#.to_vec(),
        };

        assert!(response.is_success());
        assert!(response.text().contains("Queued"));

        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["message"], "Queued. Thank you.");
    }

    #[test]
    fn test_http_response_not_success() {
        let response = HttpResponse {
            status: 401,
            headers: HashMap::new(),
            body: b"Forbidden".to_vec(),
        };

        assert!(!response.is_success());
    }

    #[test]
    fn test_request_builders() {
        let request = HttpRequest::get("mg.example.com/events")
            .with_header("Accept", "application/json")
            .with_timeout(Duration::from_secs(3));

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.headers.get("Accept").map(String::as_str), Some("application/json"));
        assert_eq!(request.timeout, Some(Duration::from_secs(3)));
        assert!(HttpRequest::post("x").with_body(vec![1]).body.is_some());
    }
}
