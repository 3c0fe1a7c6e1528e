//! In-memory file attachments.

use crate::errors::{MailgunError, MailgunResult};

/// An attachment whose bytes are already in memory.
///
/// On-disk attachments and inline images are plain paths on the message
/// and are read when the message is serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct FileAttachment {
    data: Vec<u8>,
    name: String,
}

impl FileAttachment {
    /// Creates an attachment from raw bytes and the file name the
    /// recipient will see.
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> MailgunResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(MailgunError::argument_missing("name"));
        }

        Ok(Self {
            data: data.into(),
            name,
        })
    }

    /// File name of the attachment.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw bytes of the attachment.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Content type guessed from the file name.
    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .to_string()
    }
}

impl std::fmt::Debug for FileAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAttachment")
            .field("name", &self.name)
            .field("size", &self.data.len())
            .finish()
    }
}
