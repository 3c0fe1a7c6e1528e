//! Email recipients.

use crate::errors::{MailgunError, MailgunResult};

/// Anything that can be rendered as an RFC 5322 style address.
pub trait Addressable {
    /// The bare email address.
    fn email(&self) -> &str;

    /// The optional display name.
    fn display_name(&self) -> Option<&str>;

    /// Validates the address and renders it for the wire.
    ///
    /// Returns the bare address when there is no display name, otherwise
    /// `"Display Name" <address>` with quotes inside the name escaped.
    fn format(&self) -> MailgunResult<String> {
        let email = self.email();
        validate_email(email)?;

        match self.display_name() {
            Some(name) if !name.is_empty() => {
                Ok(format!("\"{}\" <{}>", name.replace('"', "\\\""), email))
            }
            _ => Ok(email.to_string()),
        }
    }
}

/// Basic shape check: exactly one `@` and no `.@`.
fn validate_email(email: &str) -> MailgunResult<()> {
    if email.matches('@').count() != 1 || email.contains(".@") {
        return Err(MailgunError::invalid_address(email));
    }

    Ok(())
}

/// An email recipient with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Recipient {
    /// Display name shown by mail clients.
    pub display_name: Option<String>,
    /// Email address.
    pub email: String,
}

impl Recipient {
    /// Creates a recipient from a bare address.
    ///
    /// The address is not validated until it is formatted.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            display_name: None,
            email: email.into(),
        }
    }

    /// Creates a recipient with a display name.
    pub fn with_name(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            email: email.into(),
        }
    }
}

impl Addressable for Recipient {
    fn email(&self) -> &str {
        &self.email
    }

    fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
}

impl From<&str> for Recipient {
    fn from(email: &str) -> Self {
        Recipient::new(email)
    }
}

impl From<String> for Recipient {
    fn from(email: String) -> Self {
        Recipient::new(email)
    }
}
