//! Type definitions for the Mailgun API.

pub mod attachment;
pub mod events;
pub mod message;
pub mod recipient;

pub use attachment::FileAttachment;
pub use events::{
    DeliveryStatus, Envelope, EventMessage, EventMessageHeaders, EventPage, Flags, MessageEvent,
    Paging, Storage,
};
pub use message::{Message, MultipartForm};
pub use recipient::{Addressable, Recipient};
