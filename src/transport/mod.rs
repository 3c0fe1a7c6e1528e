//! HTTP transport layer for the Mailgun client.
//!
//! Provides the HTTP transport abstraction and the reqwest implementation
//! used to post message forms and fetch event pages. The transport performs
//! a single attempt per call; there is no retry or queuing.

mod http;

pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, HttpTransportImpl};

use std::collections::HashMap;
use std::time::Duration;

/// Multipart request for message submission.
#[derive(Debug, Clone)]
pub struct MultipartRequest {
    /// Request path.
    pub path: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Multipart form parts.
    pub parts: Vec<MultipartPart>,
    /// Request timeout.
    pub timeout: Option<Duration>,
}

/// A part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartPart {
    /// Text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// File field.
    File {
        /// Field name.
        name: String,
        /// File name.
        filename: String,
        /// Content type.
        content_type: String,
        /// File data.
        data: Vec<u8>,
    },
}

impl MultipartPart {
    /// Returns the form field name of this part.
    pub fn name(&self) -> &str {
        match self {
            MultipartPart::Text { name, .. } | MultipartPart::File { name, .. } => name,
        }
    }

    /// Returns true for binary file parts.
    pub fn is_file(&self) -> bool {
        matches!(self, MultipartPart::File { .. })
    }
}

/// Transport error types.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection error.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Timeout after {timeout:?}")]
    Timeout {
        /// Timeout duration.
        timeout: Duration,
    },

    /// The request could not be built (bad header value, bad content type).
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// Invalid response.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipart_part_accessors() {
        let text = MultipartPart::Text {
            name: "subject".to_string(),
            value: "Hello".to_string(),
        };
        let file = MultipartPart::File {
            name: "attachment".to_string(),
            filename: "report.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            data: vec![0x25, 0x50, 0x44, 0x46],
        };

        assert_eq!(text.name(), "subject");
        assert!(!text.is_file());
        assert_eq!(file.name(), "attachment");
        assert!(file.is_file());
    }
}
