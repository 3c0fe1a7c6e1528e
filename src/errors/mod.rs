//! Error types for the Mailgun client.
//!
//! Provides the error taxonomy for message construction, serialization,
//! configuration, and the thin HTTP boundary.
//!
//! Construction and serialization errors are raised synchronously to the
//! immediate caller and never retried. Transport failures are surfaced as-is;
//! non-2xx responses to a send are returned to the caller rather than
//! converted into errors.

use std::path::PathBuf;
use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for Mailgun operations.
pub type MailgunResult<T> = Result<T, MailgunError>;

/// Error type for Mailgun client operations.
#[derive(Debug, Error)]
pub enum MailgunError {
    /// A required argument was absent (empty string, empty path, or null JSON).
    #[error("Required argument missing: {argument}")]
    ArgumentMissing {
        /// Name of the missing argument.
        argument: String,
    },

    /// An argument was present but outside its accepted range.
    #[error("Invalid argument {argument}: {message}")]
    InvalidArgument {
        /// Name of the argument.
        argument: String,
        /// What is wrong with it.
        message: String,
    },

    /// A required message field was not set when the message was serialized.
    #[error("Required field missing: {field}")]
    RequiredFieldMissing {
        /// Name of the missing field.
        field: String,
    },

    /// A recipient email address failed the shape check.
    #[error("Invalid email address: {address}")]
    InvalidAddress {
        /// The rejected address.
        address: String,
    },

    /// Adding a recipient would exceed the per-list cap.
    #[error("Messages cannot contain more than {limit} {list} recipients")]
    RecipientLimitExceeded {
        /// The recipient list (`to`, `cc` or `bcc`).
        list: RecipientList,
        /// The cap that was hit.
        limit: usize,
    },

    /// A local delivery time could not be mapped to a UTC instant.
    #[error("Invalid delivery time: {message}")]
    InvalidDeliveryTime {
        /// Error message.
        message: String,
    },

    /// An on-disk attachment or inline image could not be read.
    #[error("Failed to read attachment {}: {source}", .path.display())]
    Attachment {
        /// Path of the file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration error (missing API key, bad base URL, etc.)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// Network/connection error.
    #[error("Transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Request timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// The events endpoint answered with a non-2xx status.
    #[error("Unexpected HTTP status {status}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The events endpoint answered with a body that is not an event page.
    #[error("Failed to parse event page: {message}")]
    EventParse {
        /// Parser error message.
        message: String,
        /// Raw response body.
        body: String,
    },

    /// Serialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },
}

/// The recipient list a recipient is added to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientList {
    /// Primary recipients.
    To,
    /// Carbon-copy recipients.
    Cc,
    /// Blind carbon-copy recipients.
    Bcc,
}

impl RecipientList {
    /// Returns the wire name of the list.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipientList::To => "to",
            RecipientList::Cc => "cc",
            RecipientList::Bcc => "bcc",
        }
    }
}

impl std::fmt::Display for RecipientList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MailgunError {
    /// Creates an argument missing error.
    pub fn argument_missing(argument: impl Into<String>) -> Self {
        MailgunError::ArgumentMissing {
            argument: argument.into(),
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        MailgunError::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Creates a required field missing error.
    pub fn required_field(field: impl Into<String>) -> Self {
        MailgunError::RequiredFieldMissing {
            field: field.into(),
        }
    }

    /// Creates an invalid address error.
    pub fn invalid_address(address: impl Into<String>) -> Self {
        MailgunError::InvalidAddress {
            address: address.into(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        MailgunError::Configuration {
            message: message.into(),
        }
    }

    /// Returns true for errors raised while building or serializing a message.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            MailgunError::ArgumentMissing { .. }
                | MailgunError::InvalidArgument { .. }
                | MailgunError::RequiredFieldMissing { .. }
                | MailgunError::InvalidAddress { .. }
                | MailgunError::RecipientLimitExceeded { .. }
        )
    }

    /// Returns true if the failure happened on the wire and the same request
    /// could succeed later. The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MailgunError::Transport { .. } | MailgunError::Timeout { .. }
        )
    }
}

impl From<TransportError> for MailgunError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout { .. } => MailgunError::Timeout {
                message: err.to_string(),
            },
            TransportError::Connection { .. } | TransportError::InvalidResponse { .. } => {
                MailgunError::Transport {
                    message: err.to_string(),
                }
            }
            TransportError::InvalidRequest { message } => MailgunError::Configuration { message },
        }
    }
}

impl From<serde_json::Error> for MailgunError {
    fn from(err: serde_json::Error) -> Self {
        MailgunError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for MailgunError {
    fn from(err: url::ParseError) -> Self {
        MailgunError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_recipient_limit_message() {
        let error = MailgunError::RecipientLimitExceeded {
            list: RecipientList::Cc,
            limit: 1000,
        };

        assert_eq!(
            error.to_string(),
            "Messages cannot contain more than 1000 cc recipients"
        );
    }

    #[test]
    fn test_is_validation() {
        assert!(MailgunError::argument_missing("subject").is_validation());
        assert!(MailgunError::required_field("to").is_validation());
        assert!(MailgunError::invalid_address("nope").is_validation());
        assert!(!MailgunError::configuration("bad").is_validation());
    }

    #[test]
    fn test_is_retryable() {
        assert!(MailgunError::Timeout {
            message: "slow".to_string()
        }
        .is_retryable());
        assert!(!MailgunError::UnexpectedStatus {
            status: 500,
            body: String::new()
        }
        .is_retryable());
    }

    #[test]
    fn test_from_transport_error() {
        let error: MailgunError = TransportError::Timeout {
            timeout: Duration::from_secs(5),
        }
        .into();
        assert!(matches!(error, MailgunError::Timeout { .. }));

        let error: MailgunError = TransportError::Connection {
            message: "refused".to_string(),
        }
        .into();
        assert!(matches!(error, MailgunError::Transport { .. }));
    }

    #[test]
    fn test_attachment_error_display() {
        let error = MailgunError::Attachment {
            path: PathBuf::from("/tmp/missing.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };

        assert!(error.to_string().contains("/tmp/missing.pdf"));
    }
}
