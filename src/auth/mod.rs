//! Authentication module for the Mailgun client.
//!
//! Mailgun uses HTTP Basic authentication with the literal username `api`
//! and the account API key as the password.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

use crate::config::{key_hint, BASIC_AUTH_USERNAME};
use crate::errors::MailgunError;

/// Authentication provider trait.
///
/// Implementations of this trait provide authentication credentials
/// for API requests.
pub trait AuthProvider: Send + Sync {
    /// Apply authentication to request headers.
    fn apply_auth(&self, headers: &mut HashMap<String, String>);

    /// Get the authentication scheme name.
    fn scheme(&self) -> &str;

    /// Validate the credentials.
    fn validate(&self) -> Result<(), MailgunError>;
}

/// HTTP Basic authentication with the `api` user.
pub struct BasicAuth {
    api_key: SecretString,
}

impl BasicAuth {
    /// Creates a new Basic authentication provider.
    pub fn new(api_key: SecretString) -> Self {
        Self { api_key }
    }

    /// Creates from a string API key.
    pub fn from_string(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
        }
    }

    /// Gets a hint of the API key for debugging (last 4 characters).
    pub fn key_hint(&self) -> String {
        key_hint(self.api_key.expose_secret())
    }

    fn encoded_credentials(&self) -> String {
        STANDARD.encode(format!(
            "{}:{}",
            BASIC_AUTH_USERNAME,
            self.api_key.expose_secret()
        ))
    }
}

impl AuthProvider for BasicAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            "Authorization".to_string(),
            format!("Basic {}", self.encoded_credentials()),
        );
    }

    fn scheme(&self) -> &str {
        "Basic"
    }

    fn validate(&self) -> Result<(), MailgunError> {
        if self.api_key.expose_secret().is_empty() {
            return Err(MailgunError::configuration("API key cannot be empty"));
        }

        Ok(())
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &BASIC_AUTH_USERNAME)
            .field("api_key", &"[REDACTED]")
            .field("key_hint", &self.key_hint())
            .finish()
    }
}
