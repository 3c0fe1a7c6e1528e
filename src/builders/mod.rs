//! Builders for constructing outbound messages.
//!
//! [`MessageBuilder`] accumulates a [`Message`](crate::types::Message) one
//! call at a time and rejects bad input at the call that supplies it:
//! missing arguments and recipient caps fail immediately, while address
//! shape and required fields are checked when the message is serialized.
//!
//! # Example
//!
//! ```rust
//! use integrations_mailgun::builders::MessageBuilder;
//! use integrations_mailgun::types::Recipient;
//!
//! let mut builder = MessageBuilder::new();
//! builder
//!     .set_from_address(Recipient::with_name("noreply@mg.example.com", "Example"))?
//!     .add_to_recipient(Recipient::new("alice@example.com"), None)?
//!     .set_subject("Welcome")?
//!     .set_text_body("Thanks for signing up.")?
//!     .add_tag("welcome")?
//!     .set_open_tracking(true);
//!
//! let message = builder.build();
//! assert_eq!(message.to.len(), 1);
//! # Ok::<(), integrations_mailgun::MailgunError>(())
//! ```

mod message_builder;

pub use message_builder::MessageBuilder;
