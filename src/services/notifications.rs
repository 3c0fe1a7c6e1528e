//! Single-recipient notifications.
//!
//! A thin layer over [`MessageService`] for account e-mails (confirmation
//! links, password resets) where every message shares the same sender,
//! flags, tags and headers.

use std::collections::BTreeMap;
use tracing::instrument;

use crate::builders::MessageBuilder;
use crate::errors::{MailgunError, MailgunResult};
use crate::services::MessageService;
use crate::transport::HttpResponse;
use crate::types::Recipient;

/// A notification addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Recipient address.
    pub destination: String,
    /// Subject line.
    pub subject: String,
    /// Body, sent as HTML or plain text depending on the options.
    pub body: String,
}

impl Notification {
    /// Creates a notification.
    pub fn new(
        destination: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            destination: destination.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Defaults applied to every notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationOptions {
    /// Sending domain.
    pub domain: String,
    /// Sender used when a call does not name one.
    pub default_from: Recipient,
    /// Reply-to used when a call does not name one.
    pub default_reply_to: Option<Recipient>,
    /// Send the body as HTML instead of plain text.
    pub use_html_body: bool,
    /// Enable DKIM signing.
    pub dkim: bool,
    /// Enable test mode.
    pub test_mode: bool,
    /// Enable tracking.
    pub tracking: bool,
    /// Enable click tracking.
    pub tracking_clicks: bool,
    /// Enable open tracking.
    pub tracking_opens: bool,
    /// Tags added to every notification.
    pub default_tags: Vec<String>,
    /// Headers added to every notification.
    pub default_headers: BTreeMap<String, String>,
}

impl NotificationOptions {
    /// Creates options with a plain-text body, DKIM on and every other
    /// flag off.
    pub fn new(domain: impl Into<String>, default_from: impl Into<Recipient>) -> Self {
        Self {
            domain: domain.into(),
            default_from: default_from.into(),
            default_reply_to: None,
            use_html_body: false,
            dkim: true,
            test_mode: false,
            tracking: false,
            tracking_clicks: false,
            tracking_opens: false,
            default_tags: Vec::new(),
            default_headers: BTreeMap::new(),
        }
    }

    /// Sets the default reply-to address.
    pub fn default_reply_to(mut self, reply_to: impl Into<Recipient>) -> Self {
        self.default_reply_to = Some(reply_to.into());
        self
    }

    /// Sends bodies as HTML.
    pub fn use_html_body(mut self, enabled: bool) -> Self {
        self.use_html_body = enabled;
        self
    }

    /// Enables or disables DKIM signing.
    pub fn dkim(mut self, enabled: bool) -> Self {
        self.dkim = enabled;
        self
    }

    /// Enables or disables test mode.
    pub fn test_mode(mut self, enabled: bool) -> Self {
        self.test_mode = enabled;
        self
    }

    /// Enables or disables tracking.
    pub fn tracking(mut self, enabled: bool) -> Self {
        self.tracking = enabled;
        self
    }

    /// Enables or disables click tracking.
    pub fn tracking_clicks(mut self, enabled: bool) -> Self {
        self.tracking_clicks = enabled;
        self
    }

    /// Enables or disables open tracking.
    pub fn tracking_opens(mut self, enabled: bool) -> Self {
        self.tracking_opens = enabled;
        self
    }

    /// Adds a default tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.default_tags.push(tag.into());
        self
    }

    /// Adds a default header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Checks that the domain and default sender are present.
    pub fn validate(&self) -> MailgunResult<()> {
        if self.domain.is_empty() {
            return Err(MailgunError::configuration(
                "Notification option 'domain' is required",
            ));
        }
        if self.default_from.email.is_empty() {
            return Err(MailgunError::configuration(
                "Notification option 'default_from' is required",
            ));
        }
        Ok(())
    }
}

/// Sends [`Notification`]s with shared defaults.
#[derive(Debug, Clone)]
pub struct NotificationService {
    messages: MessageService,
    options: NotificationOptions,
}

impl NotificationService {
    /// Creates a service from validated options.
    pub fn new(messages: MessageService, options: NotificationOptions) -> MailgunResult<Self> {
        options.validate()?;
        Ok(Self { messages, options })
    }

    /// Creates a service that sends plain-text notifications with default
    /// flags.
    pub fn simple(
        messages: MessageService,
        domain: impl Into<String>,
        default_from: impl Into<Recipient>,
    ) -> MailgunResult<Self> {
        Self::new(messages, NotificationOptions::new(domain, default_from))
    }

    /// The options in effect.
    pub fn options(&self) -> &NotificationOptions {
        &self.options
    }

    /// Sends from the default sender.
    pub async fn send(&self, notification: &Notification) -> MailgunResult<HttpResponse> {
        self.send_from_with_reply_to(notification, None, None).await
    }

    /// Sends from the given sender for this call only.
    pub async fn send_from(
        &self,
        notification: &Notification,
        from: Recipient,
    ) -> MailgunResult<HttpResponse> {
        self.send_from_with_reply_to(notification, Some(from), None)
            .await
    }

    /// Sends with an explicit sender and reply-to for this call only.
    /// `None` falls back to the configured defaults.
    #[instrument(skip_all, fields(domain = %self.options.domain))]
    pub async fn send_from_with_reply_to(
        &self,
        notification: &Notification,
        from: Option<Recipient>,
        reply_to: Option<Recipient>,
    ) -> MailgunResult<HttpResponse> {
        let builder = self.compose(notification, from, reply_to)?;
        self.messages
            .send(&self.options.domain, builder.message())
            .await
    }

    fn compose(
        &self,
        notification: &Notification,
        from: Option<Recipient>,
        reply_to: Option<Recipient>,
    ) -> MailgunResult<MessageBuilder> {
        let options = &self.options;
        let mut builder = MessageBuilder::new();

        builder
            .set_from_address(from.unwrap_or_else(|| options.default_from.clone()))?
            .add_to_recipient(Recipient::new(notification.destination.as_str()), None)?
            .set_subject(notification.subject.as_str())?;

        if options.use_html_body {
            builder.set_html_body(notification.body.as_str())?;
        } else {
            builder.set_text_body(notification.body.as_str())?;
        }

        builder
            .set_dkim(options.dkim)
            .set_test_mode(options.test_mode)
            .set_tracking(options.tracking)
            .set_click_tracking(options.tracking_clicks)
            .set_open_tracking(options.tracking_opens);

        for tag in &options.default_tags {
            builder.add_tag(tag.as_str())?;
        }
        for (name, value) in &options.default_headers {
            builder.add_custom_header(name.as_str(), value.as_str())?;
        }

        if let Some(reply_to) = reply_to.or_else(|| options.default_reply_to.clone()) {
            builder.set_reply_to_address(reply_to)?;
        }

        Ok(builder)
    }
}
