//! Integration tests using WireMock
//!
//! These tests run the full request/response cycle against a mock HTTP
//! server: multipart serialization, Basic authentication, query encoding,
//! and response handling.

mod events;
mod messages;

use integrations_mailgun::MailgunClient;
use wiremock::MockServer;

/// API key used by every test client.
pub const TEST_API_KEY: &str = "key-test";

/// `Basic base64("api:key-test")`.
pub const TEST_AUTH_HEADER: &str = "Basic YXBpOmtleS10ZXN0";

/// Sending domain used by every test.
pub const TEST_DOMAIN: &str = "mg.example.com";

/// Starts a mock server.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Creates a client pointed at the mock server.
pub fn client_for(server: &MockServer) -> MailgunClient {
    MailgunClient::builder()
        .api_key(TEST_API_KEY)
        .base_url(server.uri())
        .build()
        .expect("Failed to build client")
}
