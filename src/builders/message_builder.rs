//! Fluent accumulator for [`Message`].

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use std::path::PathBuf;

use crate::config::MAXIMUM_ALLOWED_RECIPIENTS;
use crate::errors::{MailgunError, MailgunResult, RecipientList};
use crate::types::{Addressable, FileAttachment, Message, Recipient};

/// Builds a [`Message`] incrementally.
///
/// Mutators that can reject their input return `MailgunResult<&mut Self>`
/// so calls chain with `?`; infallible ones return `&mut Self`. A fresh
/// builder starts with DKIM enabled.
///
/// Each of `to`, `cc` and `bcc` holds at most
/// [`MAXIMUM_ALLOWED_RECIPIENTS`] entries; the call that would add one more
/// fails with [`MailgunError::RecipientLimitExceeded`].
///
/// # Example
///
/// ```rust
/// use integrations_mailgun::builders::MessageBuilder;
/// use integrations_mailgun::types::Recipient;
/// use serde_json::json;
///
/// let mut builder = MessageBuilder::new();
/// builder
///     .set_from_address(Recipient::new("news@mg.example.com"))?
///     .add_to_recipient(
///         Recipient::with_name("alice@example.com", "Alice"),
///         json!({"first": "Alice"}).as_object().cloned(),
///     )?
///     .add_cc_recipient(Recipient::new("archive@example.com"))?
///     .set_subject("Hello %recipient.first%")?
///     .set_html_body("<p>Hi %recipient.first%</p>")?
///     .add_custom_data("order", json!({"id": 42}))?;
///
/// let pairs = builder.message().to_key_value_pairs()?;
/// assert_eq!(pairs[0].1, "\"Alice\" <alice@example.com>,");
/// # Ok::<(), integrations_mailgun::MailgunError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    /// Creates a builder holding an empty message with DKIM enabled.
    pub fn new() -> Self {
        Self {
            message: Message {
                dkim: true,
                ..Message::default()
            },
        }
    }

    /// Adds a primary recipient.
    ///
    /// When `recipient_variables` is given it is recorded under the
    /// recipient's email for batch template substitution.
    pub fn add_to_recipient(
        &mut self,
        recipient: impl Into<Recipient>,
        recipient_variables: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> MailgunResult<&mut Self> {
        let recipient = require_recipient(recipient.into())?;
        ensure_capacity(&self.message.to, RecipientList::To)?;

        if let Some(variables) = recipient_variables {
            self.message.recipient_variables.insert(
                recipient.email.clone(),
                serde_json::Value::Object(variables),
            );
        }

        self.message.to.push(recipient);
        Ok(self)
    }

    /// Adds several primary recipients without recipient variables.
    ///
    /// Stops at the first recipient that is rejected; the ones before it
    /// stay on the message.
    pub fn add_to_recipient_list<I, R>(&mut self, recipients: I) -> MailgunResult<&mut Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Recipient>,
    {
        for recipient in recipients {
            self.add_to_recipient(recipient, None)?;
        }
        Ok(self)
    }

    /// Adds a carbon-copy recipient.
    pub fn add_cc_recipient(&mut self, recipient: impl Into<Recipient>) -> MailgunResult<&mut Self> {
        let recipient = require_recipient(recipient.into())?;
        ensure_capacity(&self.message.cc, RecipientList::Cc)?;

        self.message.cc.push(recipient);
        Ok(self)
    }

    /// Adds a blind carbon-copy recipient.
    pub fn add_bcc_recipient(
        &mut self,
        recipient: impl Into<Recipient>,
    ) -> MailgunResult<&mut Self> {
        let recipient = require_recipient(recipient.into())?;
        ensure_capacity(&self.message.bcc, RecipientList::Bcc)?;

        self.message.bcc.push(recipient);
        Ok(self)
    }

    /// Sets the sender.
    pub fn set_from_address(&mut self, sender: impl Into<Recipient>) -> MailgunResult<&mut Self> {
        self.message.from = Some(require_recipient(sender.into())?);
        Ok(self)
    }

    /// Sets the reply-to address.
    ///
    /// Sent as a `reply-to` custom header; the address is validated here.
    pub fn set_reply_to_address(
        &mut self,
        recipient: impl Into<Recipient>,
    ) -> MailgunResult<&mut Self> {
        let formatted = require_recipient(recipient.into())?.format()?;
        self.message
            .custom_headers
            .insert("reply-to".to_string(), formatted);
        Ok(self)
    }

    /// Sets the subject.
    pub fn set_subject(&mut self, subject: impl Into<String>) -> MailgunResult<&mut Self> {
        self.message.subject = Some(require_text("subject", subject.into())?);
        Ok(self)
    }

    /// Sets the plain text body.
    pub fn set_text_body(&mut self, text: impl Into<String>) -> MailgunResult<&mut Self> {
        self.message.text = Some(require_text("text", text.into())?);
        Ok(self)
    }

    /// Sets the HTML body.
    pub fn set_html_body(&mut self, html: impl Into<String>) -> MailgunResult<&mut Self> {
        self.message.html = Some(require_text("html", html.into())?);
        Ok(self)
    }

    /// Attaches a file from disk. The file is read when the message is
    /// serialized, not here.
    pub fn add_attachment(&mut self, path: impl Into<PathBuf>) -> MailgunResult<&mut Self> {
        self.message.attachments.push(require_path(path.into())?);
        Ok(self)
    }

    /// Attaches an in-memory file.
    pub fn add_file_attachment(&mut self, attachment: FileAttachment) -> &mut Self {
        self.message.file_attachments.push(attachment);
        self
    }

    /// Adds an inline image from disk, referenced from the HTML body as
    /// `cid:<file name>`.
    pub fn add_inline_image(&mut self, path: impl Into<PathBuf>) -> MailgunResult<&mut Self> {
        self.message.inline.push(require_path(path.into())?);
        Ok(self)
    }

    /// Enables or disables test mode.
    pub fn set_test_mode(&mut self, enabled: bool) -> &mut Self {
        self.message.test_mode = enabled;
        self
    }

    /// Sets the campaign identifier.
    pub fn add_campaign_id(&mut self, campaign_id: impl Into<String>) -> &mut Self {
        self.message.campaign_id = Some(campaign_id.into());
        self
    }

    /// Appends a tag.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> MailgunResult<&mut Self> {
        self.message.tags.push(require_text("tag", tag.into())?);
        Ok(self)
    }

    /// Enables or disables DKIM signing.
    pub fn set_dkim(&mut self, enabled: bool) -> &mut Self {
        self.message.dkim = enabled;
        self
    }

    /// Enables or disables open tracking.
    pub fn set_open_tracking(&mut self, enabled: bool) -> &mut Self {
        self.message.tracking_opens = enabled;
        self
    }

    /// Enables or disables click tracking.
    pub fn set_click_tracking(&mut self, enabled: bool) -> &mut Self {
        self.message.tracking_clicks = enabled;
        self
    }

    /// Enables or disables tracking.
    pub fn set_tracking(&mut self, enabled: bool) -> &mut Self {
        self.message.tracking = enabled;
        self
    }

    /// Schedules delivery from a wall-clock time.
    ///
    /// With an offset, the time is read in that offset. Without one it is
    /// read in the system time zone; an ambiguous time resolves to the
    /// earlier instant and a time skipped by a DST change fails with
    /// [`MailgunError::InvalidDeliveryTime`].
    #[deprecated(note = "use `schedule_delivery_time` with a zone-aware `DateTime`")]
    pub fn set_delivery_time(
        &mut self,
        local: NaiveDateTime,
        offset: Option<FixedOffset>,
    ) -> MailgunResult<&mut Self> {
        let utc = match offset {
            Some(offset) => offset
                .from_local_datetime(&local)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
            None => Local
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
        .ok_or_else(|| MailgunError::InvalidDeliveryTime {
            message: format!("{} does not exist in the local time zone", local),
        })?;

        self.message.delivery_time = Some(utc);
        Ok(self)
    }

    /// Schedules delivery at an instant in any time zone; stored as UTC.
    pub fn schedule_delivery_time<Tz: TimeZone>(&mut self, at: DateTime<Tz>) -> &mut Self {
        self.message.delivery_time = Some(at.with_timezone(&Utc));
        self
    }

    /// Adds custom JSON data, sent as `v:<name>`. A later value for the
    /// same name replaces the earlier one.
    pub fn add_custom_data(
        &mut self,
        name: impl Into<String>,
        data: serde_json::Value,
    ) -> MailgunResult<&mut Self> {
        let name = require_text("name", name.into())?;
        if data.is_null() {
            return Err(MailgunError::argument_missing("data"));
        }

        self.message.custom_data.insert(name, data);
        Ok(self)
    }

    /// Adds a raw form parameter sent under its own name.
    pub fn add_custom_parameter(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> MailgunResult<&mut Self> {
        let name = require_text("name", name.into())?;
        let value = require_text("value", value.into())?;

        self.message.custom_parameters.insert(name, value);
        Ok(self)
    }

    /// Adds a custom MIME header, sent as `h:<name>`.
    pub fn add_custom_header(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> MailgunResult<&mut Self> {
        let name = require_text("name", name.into())?;
        let value = require_text("value", value.into())?;

        self.message.custom_headers.insert(name, value);
        Ok(self)
    }

    /// Replaces the message being built.
    pub fn set_message(&mut self, message: Message) -> &mut Self {
        self.message = message;
        self
    }

    /// Borrows the message being built.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Returns a snapshot of the message; later builder calls do not
    /// affect it.
    pub fn get_message(&self) -> Message {
        self.message.clone()
    }

    /// Finishes building and returns the message.
    pub fn build(self) -> Message {
        self.message
    }

    /// On-disk attachments only; in-memory attachments and inline images
    /// are not included.
    pub fn files(&self) -> &[PathBuf] {
        &self.message.attachments
    }
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_capacity(list: &[Recipient], kind: RecipientList) -> MailgunResult<()> {
    if list.len() >= MAXIMUM_ALLOWED_RECIPIENTS {
        return Err(MailgunError::RecipientLimitExceeded {
            list: kind,
            limit: MAXIMUM_ALLOWED_RECIPIENTS,
        });
    }
    Ok(())
}

fn require_recipient(recipient: Recipient) -> MailgunResult<Recipient> {
    if recipient.email.is_empty() {
        return Err(MailgunError::argument_missing("recipient"));
    }
    Ok(recipient)
}

fn require_text(argument: &str, value: String) -> MailgunResult<String> {
    if value.is_empty() {
        return Err(MailgunError::argument_missing(argument));
    }
    Ok(value)
}

fn require_path(path: PathBuf) -> MailgunResult<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(MailgunError::argument_missing("file"));
    }
    Ok(path)
}
