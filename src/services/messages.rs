//! Messages service.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

use crate::auth::AuthProvider;
use crate::errors::MailgunResult;
use crate::services::validate_domain;
use crate::transport::{HttpResponse, HttpTransport, MultipartRequest};
use crate::types::Message;

/// Sends messages through the `/<domain>/messages` endpoint.
#[derive(Clone)]
pub struct MessageService {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
}

impl MessageService {
    /// Creates a new messages service.
    pub fn new(transport: Arc<dyn HttpTransport>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { transport, auth }
    }

    /// Serializes and posts a message for the given sending domain.
    ///
    /// Validation and attachment errors are returned before any request is
    /// made. The provider's response is returned as is, whatever its status;
    /// a rejected message is a response, not an error.
    #[instrument(skip(self, message), fields(domain = %domain))]
    pub async fn send(&self, domain: &str, message: &Message) -> MailgunResult<HttpResponse> {
        validate_domain(domain)?;

        let form = message.to_transmittable_body()?;

        let mut headers = HashMap::new();
        self.auth.apply_auth(&mut headers);

        let request = MultipartRequest {
            path: format!("{}/messages", domain),
            headers,
            parts: form.into_parts(),
            timeout: None,
        };

        let response = self.transport.send_multipart(request).await?;

        if response.is_success() {
            tracing::debug!(status = response.status, "Message accepted");
        } else {
            tracing::warn!(
                status = response.status,
                body = %response.text(),
                "Message rejected by provider"
            );
        }

        Ok(response)
    }
}

impl std::fmt::Debug for MessageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageService").finish()
    }
}
