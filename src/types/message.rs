//! The outbound message aggregate and its wire serialization.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::errors::{MailgunError, MailgunResult};
use crate::transport::MultipartPart;
use crate::types::attachment::FileAttachment;
use crate::types::recipient::{Addressable, Recipient};

/// One outbound email and all of its delivery options.
///
/// Usually assembled through [`MessageBuilder`](crate::builders::MessageBuilder),
/// which enforces the recipient caps and argument checks. The fields are
/// public so a pre-built message can be handed to the builder or sent as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    /// Sender. Required for serialization.
    pub from: Option<Recipient>,
    /// Primary recipients. Required, non-empty.
    pub to: Vec<Recipient>,
    /// Carbon-copy recipients.
    pub cc: Vec<Recipient>,
    /// Blind carbon-copy recipients.
    pub bcc: Vec<Recipient>,
    /// Subject line.
    pub subject: Option<String>,
    /// Plain text body.
    pub text: Option<String>,
    /// HTML body.
    pub html: Option<String>,
    /// Files on disk sent as `attachment` parts.
    pub attachments: Vec<PathBuf>,
    /// In-memory files sent as `attachment` parts.
    pub file_attachments: Vec<FileAttachment>,
    /// Files on disk sent as `inline` parts, referenced from HTML by `cid:`.
    pub inline: Vec<PathBuf>,
    /// Tags, in insertion order.
    pub tags: Vec<String>,
    /// Campaign identifier.
    pub campaign_id: Option<String>,
    /// Enable DKIM signatures.
    pub dkim: bool,
    /// Enable test mode; the provider accepts but does not deliver.
    pub test_mode: bool,
    /// Enable tracking.
    pub tracking: bool,
    /// Enable click tracking.
    pub tracking_clicks: bool,
    /// Enable open tracking.
    pub tracking_opens: bool,
    /// Scheduled delivery instant.
    pub delivery_time: Option<DateTime<Utc>>,
    /// Custom JSON data, sent as `v:<name>`.
    pub custom_data: BTreeMap<String, serde_json::Value>,
    /// Custom MIME headers, sent as `h:<name>`.
    pub custom_headers: BTreeMap<String, String>,
    /// Raw form parameters, sent under their own names.
    pub custom_parameters: BTreeMap<String, String>,
    /// Per-recipient template variables keyed by recipient email.
    pub recipient_variables: serde_json::Map<String, serde_json::Value>,
}

impl Message {
    /// Flattens the message into ordered form fields.
    ///
    /// Fails with [`MailgunError::RequiredFieldMissing`] when `to` is empty
    /// or `from` is unset, and with [`MailgunError::InvalidAddress`] when a
    /// recipient does not look like an email address. The output is
    /// deterministic for a given message.
    pub fn to_key_value_pairs(&self) -> MailgunResult<Vec<(String, String)>> {
        if self.to.is_empty() {
            return Err(MailgunError::required_field("to"));
        }
        let from = self
            .from
            .as_ref()
            .ok_or_else(|| MailgunError::required_field("from"))?;

        let mut pairs = FormPairs::default();

        pairs.push("to", join_recipients(&self.to)?);
        pairs.push_non_empty("from", &from.format()?);
        if !self.cc.is_empty() {
            pairs.push("cc", join_recipients(&self.cc)?);
        }
        if !self.bcc.is_empty() {
            pairs.push("bcc", join_recipients(&self.bcc)?);
        }

        pairs.push_optional("subject", self.subject.as_deref());
        pairs.push_optional("text", self.text.as_deref());
        pairs.push_optional("html", self.html.as_deref());
        pairs.push_optional("o:campaign", self.campaign_id.as_deref());

        if let Some(delivery_time) = self.delivery_time {
            pairs.push("o:deliverytime", delivery_time.timestamp().to_string());
        }

        pairs.push("o:dkim", yes_no(self.dkim));
        pairs.push("o:testmode", yes_no(self.test_mode));
        pairs.push("o:tracking", yes_no(self.tracking));
        pairs.push("o:tracking-clicks", yes_no(self.tracking_clicks));
        pairs.push("o:tracking-opens", yes_no(self.tracking_opens));

        for tag in &self.tags {
            pairs.push_non_empty("o:tag", tag);
        }

        if !self.recipient_variables.is_empty() {
            pairs.push(
                "recipient-variables",
                serde_json::to_string(&self.recipient_variables)?,
            );
        }

        for (name, value) in &self.custom_headers {
            if !name.is_empty() {
                pairs.push_non_empty(&format!("h:{}", name), value);
            }
        }

        // Custom data is emitted even when the value is JSON null.
        for (name, value) in &self.custom_data {
            pairs.push(format!("v:{}", name), serde_json::to_string(value)?);
        }

        for (name, value) in &self.custom_parameters {
            if !name.is_empty() {
                pairs.push_non_empty(name, value);
            }
        }

        Ok(pairs.0)
    }

    /// Builds the multipart body posted to the messages endpoint.
    ///
    /// Binary parts come first (on-disk attachments, in-memory attachments,
    /// then inline images) followed by one text part per form field. Files
    /// are read up front; if any read fails nothing is returned.
    ///
    /// The body is multipart even for text-only messages.
    pub fn to_transmittable_body(&self) -> MailgunResult<MultipartForm> {
        let fields = self.to_key_value_pairs()?;

        let mut parts = Vec::with_capacity(self.binary_part_count() + fields.len());

        for path in &self.attachments {
            parts.push(read_file_part("attachment", path)?);
        }

        for attachment in &self.file_attachments {
            parts.push(MultipartPart::File {
                name: "attachment".to_string(),
                filename: attachment.name().to_string(),
                content_type: attachment.content_type(),
                data: attachment.data().to_vec(),
            });
        }

        for path in &self.inline {
            parts.push(read_file_part("inline", path)?);
        }

        parts.extend(
            fields
                .into_iter()
                .map(|(name, value)| MultipartPart::Text { name, value }),
        );

        let form = MultipartForm { parts };
        tracing::debug!(
            fields = form.parts.len() - form.file_count(),
            files = form.file_count(),
            bytes = form.binary_size(),
            "Serialized message"
        );

        Ok(form)
    }

    /// Returns true if the message carries any binary content.
    pub fn has_binary_content(&self) -> bool {
        self.binary_part_count() > 0
    }

    fn binary_part_count(&self) -> usize {
        self.attachments.len() + self.file_attachments.len() + self.inline.len()
    }
}

/// A multipart/form-data body ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<MultipartPart>,
}

impl MultipartForm {
    /// All parts in wire order.
    pub fn parts(&self) -> &[MultipartPart] {
        &self.parts
    }

    /// Consumes the form, returning its parts.
    pub fn into_parts(self) -> Vec<MultipartPart> {
        self.parts
    }

    /// Values of every text part with the given field name, in order.
    pub fn text_values(&self, field: &str) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                MultipartPart::Text { name, value } if name == field => Some(value.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Value of the first text part with the given field name.
    pub fn text_value(&self, field: &str) -> Option<&str> {
        self.text_values(field).into_iter().next()
    }

    /// Binary parts with the given field name, in order.
    pub fn file_parts(&self, field: &str) -> Vec<&MultipartPart> {
        self.parts
            .iter()
            .filter(|part| part.is_file() && part.name() == field)
            .collect()
    }

    /// Number of binary parts.
    pub fn file_count(&self) -> usize {
        self.parts.iter().filter(|part| part.is_file()).count()
    }

    fn binary_size(&self) -> usize {
        self.parts
            .iter()
            .map(|part| match part {
                MultipartPart::File { data, .. } => data.len(),
                MultipartPart::Text { .. } => 0,
            })
            .sum()
    }
}

#[derive(Default)]
struct FormPairs(Vec<(String, String)>);

impl FormPairs {
    fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    fn push_non_empty(&mut self, name: &str, value: &str) {
        if !value.is_empty() {
            self.push(name, value);
        }
    }

    fn push_optional(&mut self, name: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.push_non_empty(name, value);
        }
    }
}

/// Formats each recipient followed by a comma, including after the last one.
fn join_recipients(recipients: &[Recipient]) -> MailgunResult<String> {
    recipients.iter().try_fold(String::new(), |mut acc, recipient| {
        acc.push_str(&recipient.format()?);
        acc.push(',');
        Ok(acc)
    })
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn read_file_part(field: &str, path: &Path) -> MailgunResult<MultipartPart> {
    let data = std::fs::read(path).map_err(|source| MailgunError::Attachment {
        path: path.to_path_buf(),
        source,
    })?;

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(MultipartPart::File {
        name: field.to_string(),
        filename,
        content_type: mime_guess::from_path(path).first_or_octet_stream().to_string(),
        data,
    })
}
