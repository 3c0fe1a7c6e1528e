//! Mailgun Client Library
//!
//! A Rust client for the Mailgun email API: compose transactional messages
//! with a fluent builder, serialize them into the exact multipart form the
//! messages endpoint expects, post them with HTTP Basic authentication, and
//! read back delivery events.
//!
//! # Features
//!
//! - **Message builder**: recipients with per-recipient variables, text and
//!   HTML bodies, on-disk and in-memory attachments, inline images
//! - **Delivery options**: tags, campaigns, DKIM, test mode, tracking, and
//!   scheduled delivery
//! - **Custom metadata**: `h:` headers, `v:` JSON data, raw form parameters
//! - **Events**: filtered retrieval of delivery event pages
//! - **Notifications**: single-recipient sends with shared defaults
//! - **Observability**: `tracing` spans and events, optional subscriber setup
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use integrations_mailgun::{MailgunClient, MessageBuilder, Recipient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MailgunClient::from_env()?;
//!
//!     let mut builder = MessageBuilder::new();
//!     builder
//!         .set_from_address(Recipient::with_name("noreply@mg.example.com", "Example"))?
//!         .add_to_recipient(Recipient::new("alice@example.com"), None)?
//!         .set_subject("Your invoice")?
//!         .set_html_body("<p>Invoice attached.</p>")?
//!         .add_attachment("invoice.pdf")?
//!         .add_tag("billing")?;
//!
//!     let response = client
//!         .messages()
//!         .send("mg.example.com", builder.message())
//!         .await?;
//!
//!     if !response.is_success() {
//!         eprintln!("rejected: {}", response.text());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Events Example
//!
//! ```rust,no_run
//! use integrations_mailgun::{EventFilter, MailgunClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MailgunClient::from_env()?;
//!
//!     let filter = EventFilter::new().event("failed").limit(50);
//!     let page = client.events().fetch("mg.example.com", Some(&filter)).await?;
//!
//!     for event in &page.items {
//!         println!("{:?} {:?}", event.recipient, event.reason);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod builders;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use builders::MessageBuilder;
pub use client::{MailgunClient, MailgunClientBuilder};
pub use config::{MailgunConfig, MAXIMUM_ALLOWED_RECIPIENTS};
pub use errors::{MailgunError, MailgunResult, RecipientList};
pub use services::{
    EventFilter, EventsService, MessageService, Notification, NotificationOptions,
    NotificationService,
};
pub use transport::HttpResponse;

// Type re-exports
pub use types::attachment::FileAttachment;
pub use types::events::{EventPage, MessageEvent, Paging};
pub use types::message::{Message, MultipartForm};
pub use types::recipient::{Addressable, Recipient};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
