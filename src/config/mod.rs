//! Configuration module for the Mailgun client.
//!
//! Provides the API key, base URL, and timeout settings, plus the
//! process-wide constants shared by the message builder and services.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::errors::{MailgunError, MailgunResult};

/// Default base URL for the Mailgun API (US region).
pub const DEFAULT_BASE_URL: &str = "https://api.mailgun.net/v3";

/// Base URL for the Mailgun EU region.
pub const EU_BASE_URL: &str = "https://api.eu.mailgun.net/v3";

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of recipients in each of the `to`, `cc` and `bcc` lists.
pub const MAXIMUM_ALLOWED_RECIPIENTS: usize = 1000;

/// Username used for HTTP Basic authentication; the API key is the password.
pub const BASIC_AUTH_USERNAME: &str = "api";

/// Configuration for the Mailgun client.
#[derive(Clone)]
pub struct MailgunConfig {
    /// API key for authentication (stored securely).
    pub(crate) api_key: SecretString,
    /// Base URL for API requests, without a trailing slash.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl MailgunConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> MailgunConfigBuilder {
        MailgunConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MAILGUN_API_KEY` (required): API key for authentication
    /// - `MAILGUN_BASE_URL` (optional): Custom base URL, e.g. the EU region
    /// - `MAILGUN_TIMEOUT` (optional): Request timeout in seconds
    pub fn from_env() -> MailgunResult<Self> {
        let api_key = std::env::var("MAILGUN_API_KEY").map_err(|_| {
            MailgunError::configuration("MAILGUN_API_KEY environment variable not set")
        })?;

        let mut builder = MailgunConfigBuilder::new().api_key(api_key);

        if let Ok(base_url) = std::env::var("MAILGUN_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        if let Ok(timeout_str) = std::env::var("MAILGUN_TIMEOUT") {
            let secs = timeout_str.parse::<u64>().map_err(|_| {
                MailgunError::configuration(format!(
                    "MAILGUN_TIMEOUT must be a number of seconds, got '{}'",
                    timeout_str
                ))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Returns the API key (exposing the secret).
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns the API key hint (last 4 characters) for debugging.
    pub fn api_key_hint(&self) -> String {
        key_hint(self.api_key.expose_secret())
    }

    /// Returns the full URL for an endpoint.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Last 4 characters of a key, or `****` for keys of 4 characters or fewer.
pub(crate) fn key_hint(key: &str) -> String {
    let count = key.chars().count();
    if count > 4 {
        let tail: String = key.chars().skip(count - 4).collect();
        format!("...{}", tail)
    } else {
        "****".to_string()
    }
}

impl std::fmt::Debug for MailgunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailgunConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for `MailgunConfig`.
#[derive(Default)]
pub struct MailgunConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl MailgunConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Selects the EU region endpoint.
    pub fn eu_region(self) -> Self {
        self.base_url(EU_BASE_URL)
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Overrides the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> MailgunResult<MailgunConfig> {
        let api_key = self
            .api_key
            .ok_or_else(|| MailgunError::configuration("API key is required"))?;

        if api_key.is_empty() {
            return Err(MailgunError::configuration("API key cannot be empty"));
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if base_url.starts_with("http://") {
            tracing::warn!(base_url = %base_url, "Mailgun base URL does not use HTTPS");
        } else if !base_url.starts_with("https://") {
            return Err(MailgunError::configuration(
                "Base URL must start with http:// or https://",
            ));
        }

        Ok(MailgunConfig {
            api_key: SecretString::new(api_key),
            base_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            user_agent: self.user_agent.unwrap_or_else(|| {
                format!("integrations-mailgun/{}", env!("CARGO_PKG_VERSION"))
            }),
        })
    }
}
