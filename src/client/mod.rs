//! Mailgun API client.
//!
//! Provides the main client interface for sending messages and reading
//! delivery events.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthProvider, BasicAuth};
use crate::config::{MailgunConfig, MailgunConfigBuilder};
use crate::errors::{MailgunError, MailgunResult};
use crate::services::{EventsService, MessageService, NotificationOptions, NotificationService};
use crate::transport::{HttpTransport, HttpTransportImpl};
use crate::types::Recipient;

/// The main Mailgun client.
///
/// # Example
///
/// ```rust,no_run
/// use integrations_mailgun::{MailgunClient, MessageBuilder, Recipient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = MailgunClient::builder()
///         .api_key("key-your-api-key")
///         .build()?;
///
///     let mut builder = MessageBuilder::new();
///     builder
///         .set_from_address(Recipient::new("noreply@mg.example.com"))?
///         .add_to_recipient(Recipient::new("alice@example.com"), None)?
///         .set_subject("Hello")?
///         .set_text_body("Hello from Rust")?;
///
///     let response = client
///         .messages()
///         .send("mg.example.com", builder.message())
///         .await?;
///     println!("{} {}", response.status, response.text());
///     Ok(())
/// }
/// ```
pub struct MailgunClient {
    config: MailgunConfig,
    messages_service: MessageService,
    events_service: EventsService,
}

impl MailgunClient {
    /// Creates a new client builder.
    pub fn builder() -> MailgunClientBuilder {
        MailgunClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `MAILGUN_API_KEY` and optionally `MAILGUN_BASE_URL` and
    /// `MAILGUN_TIMEOUT`.
    pub fn from_env() -> MailgunResult<Self> {
        let config = MailgunConfig::from_env()?;
        MailgunClientBuilder::from_config(&config).build()
    }

    /// Creates a client from an API key.
    pub fn from_api_key(api_key: impl Into<String>) -> MailgunResult<Self> {
        MailgunClientBuilder::new().api_key(api_key).build()
    }

    /// Returns the messages service.
    pub fn messages(&self) -> &MessageService {
        &self.messages_service
    }

    /// Returns the events service.
    pub fn events(&self) -> &EventsService {
        &self.events_service
    }

    /// Creates a notification service with the given options.
    pub fn notifications(
        &self,
        options: NotificationOptions,
    ) -> MailgunResult<NotificationService> {
        NotificationService::new(self.messages_service.clone(), options)
    }

    /// Creates a plain-text notification service for a domain and sender.
    pub fn simple_notifications(
        &self,
        domain: impl Into<String>,
        default_from: impl Into<Recipient>,
    ) -> MailgunResult<NotificationService> {
        NotificationService::simple(self.messages_service.clone(), domain, default_from)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MailgunConfig {
        &self.config
    }
}

impl std::fmt::Debug for MailgunClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailgunClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for the Mailgun client.
pub struct MailgunClientBuilder {
    config_builder: MailgunConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AuthProvider>>,
}

impl MailgunClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config_builder: MailgunConfigBuilder::new(),
            transport: None,
            auth: None,
        }
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: &MailgunConfig) -> Self {
        Self {
            config_builder: MailgunConfigBuilder::new()
                .api_key(config.api_key())
                .base_url(&config.base_url)
                .timeout(config.timeout)
                .connect_timeout(config.connect_timeout)
                .user_agent(&config.user_agent),
            transport: None,
            auth: None,
        }
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.api_key(api_key);
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Uses the EU region endpoint.
    pub fn eu_region(mut self) -> Self {
        self.config_builder = self.config_builder.eu_region();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.connect_timeout(timeout);
        self
    }

    /// Overrides the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.user_agent(user_agent);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth provider.
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Builds the client.
    pub fn build(self) -> MailgunResult<MailgunClient> {
        let config = self.config_builder.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                HttpTransportImpl::new(
                    &config.base_url,
                    config.timeout,
                    config.connect_timeout,
                    &config.user_agent,
                )
                .map_err(|e| MailgunError::configuration(e.to_string()))?,
            ),
        };

        let auth: Arc<dyn AuthProvider> = match self.auth {
            Some(a) => a,
            None => Arc::new(BasicAuth::from_string(config.api_key())),
        };
        auth.validate()?;

        tracing::debug!(
            base_url = %config.base_url,
            api_key = %config.api_key_hint(),
            "Mailgun client configured"
        );

        Ok(MailgunClient {
            messages_service: MessageService::new(Arc::clone(&transport), Arc::clone(&auth)),
            events_service: EventsService::new(transport, auth),
            config,
        })
    }
}

impl Default for MailgunClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
