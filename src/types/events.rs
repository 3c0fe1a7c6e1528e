//! Delivery event history returned by the events endpoint.
//!
//! Every field is optional and unknown fields are ignored, so a partially
//! populated event (an `accepted` event carries no delivery status, for
//! instance) still deserializes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One page of events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPage {
    /// Events on this page.
    #[serde(default)]
    pub items: Vec<MessageEvent>,
    /// Links to neighbouring pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

impl EventPage {
    /// Returns true if the page holds no events.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// URL of the next page, if the provider returned one.
    ///
    /// The client does not follow it; callers page explicitly.
    pub fn next_page_url(&self) -> Option<&str> {
        self.paging.as_ref().and_then(|p| p.next.as_deref())
    }
}

/// Paging links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    /// Previous page.
    #[serde(default)]
    pub previous: Option<String>,
    /// Next page.
    #[serde(default)]
    pub next: Option<String>,
    /// First page.
    #[serde(default)]
    pub first: Option<String>,
    /// Last page.
    #[serde(default)]
    pub last: Option<String>,
}

/// A single delivery event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MessageEvent {
    /// Event identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Event type (`accepted`, `delivered`, `failed`, `opened`, ...).
    #[serde(default)]
    pub event: Option<String>,
    /// Unix timestamp with fractional seconds.
    #[serde(default)]
    pub timestamp: Option<f64>,
    /// Log level (`info`, `warn`, `error`).
    #[serde(default)]
    pub log_level: Option<String>,
    /// Recipient address.
    #[serde(default)]
    pub recipient: Option<String>,
    /// Recipient domain.
    #[serde(default)]
    pub recipient_domain: Option<String>,
    /// Failure severity (`temporary`, `permanent`).
    #[serde(default)]
    pub severity: Option<String>,
    /// Failure reason.
    #[serde(default)]
    pub reason: Option<String>,
    /// Tags attached at send time.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Campaigns the message belonged to.
    #[serde(default)]
    pub campaigns: Vec<serde_json::Value>,
    /// Custom data sent as `v:` variables.
    #[serde(default)]
    pub user_variables: HashMap<String, serde_json::Value>,
    /// SMTP envelope.
    #[serde(default)]
    pub envelope: Option<Envelope>,
    /// Stored message location.
    #[serde(default)]
    pub storage: Option<Storage>,
    /// Delivery attempt details.
    #[serde(default)]
    pub delivery_status: Option<DeliveryStatus>,
    /// Message summary.
    #[serde(default)]
    pub message: Option<EventMessage>,
    /// Event flags.
    #[serde(default)]
    pub flags: Option<Flags>,
}

/// SMTP delivery attempt details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeliveryStatus {
    /// SMTP status code.
    #[serde(default)]
    pub code: Option<i64>,
    /// Enhanced status code, e.g. `5.1.1`.
    #[serde(default)]
    pub enhanced_code: Option<String>,
    /// Bounce code.
    #[serde(default)]
    pub bounce_code: Option<String>,
    /// Server message.
    #[serde(default)]
    pub message: Option<String>,
    /// Human readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Attempt number.
    #[serde(default)]
    pub attempt_no: Option<u32>,
    /// Seconds until the next retry.
    #[serde(default)]
    pub retry_seconds: Option<u64>,
    /// SMTP session length in seconds.
    #[serde(default)]
    pub session_seconds: Option<f64>,
    /// Remote MX host.
    #[serde(default)]
    pub mx_host: Option<String>,
    /// SMTPUTF8 was used.
    #[serde(default)]
    pub utf8: Option<bool>,
    /// TLS was used.
    #[serde(default)]
    pub tls: Option<bool>,
    /// The remote certificate was verified.
    #[serde(default)]
    pub certificate_verified: Option<bool>,
}

/// SMTP envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Envelope {
    /// Sending IP.
    #[serde(default)]
    pub sending_ip: Option<String>,
    /// Envelope sender.
    #[serde(default)]
    pub sender: Option<String>,
    /// Envelope targets.
    #[serde(default)]
    pub targets: Option<String>,
    /// Transport (`smtp`, `http`).
    #[serde(default)]
    pub transport: Option<String>,
}

/// Event flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Flags {
    /// Sent from the provider's own test tooling.
    #[serde(default)]
    pub is_system_test: Option<bool>,
    /// Sent in test mode.
    #[serde(default)]
    pub is_test_mode: Option<bool>,
    /// Sender was authenticated.
    #[serde(default)]
    pub is_authenticated: Option<bool>,
    /// Message matched a route.
    #[serde(default)]
    pub is_routed: Option<bool>,
    /// Bounce arrived after the message was accepted remotely.
    #[serde(default)]
    pub is_delayed_bounce: Option<bool>,
}

/// Message summary attached to an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventMessage {
    /// Message size in bytes.
    #[serde(default)]
    pub size: Option<u64>,
    /// Selected headers.
    #[serde(default)]
    pub headers: Option<EventMessageHeaders>,
    /// Attachment descriptors.
    #[serde(default)]
    pub attachments: Vec<serde_json::Value>,
}

/// Selected message headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EventMessageHeaders {
    /// Subject header.
    #[serde(default)]
    pub subject: Option<String>,
    /// To header.
    #[serde(default)]
    pub to: Option<String>,
    /// From header.
    #[serde(default)]
    pub from: Option<String>,
    /// Message-Id header.
    #[serde(default)]
    pub message_id: Option<String>,
}

/// Stored copy of the message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage {
    /// Storage region.
    #[serde(default)]
    pub region: Option<String>,
    /// Storage key.
    #[serde(default)]
    pub key: Option<String>,
    /// Storage environment.
    #[serde(default)]
    pub env: Option<String>,
    /// Retrieval URL.
    #[serde(default)]
    pub url: Option<String>,
}
