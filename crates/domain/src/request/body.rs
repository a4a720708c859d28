//! HTTP request body types

use serde::{Deserialize, Serialize};

/// A request body as supplied by a caller, before encoding.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    /// No body
    #[default]
    None,
    /// Structured data serialized to JSON text on the wire
    Json(serde_json::Value),
    /// Multipart form (files plus text fields)
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Creates a JSON body from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::Json)
    }

    /// Returns true for [`RequestBody::None`].
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns true for [`RequestBody::Multipart`].
    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

/// A file carried in a multipart form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePart {
    /// File name reported to the server
    pub file_name: String,
    /// MIME type, if known
    pub content_type: Option<String>,
    /// Raw file content
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Creates a file part from in-memory content.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Sets the MIME type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Returns the content length in bytes.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A single part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartField {
    /// A plain text field
    Text {
        /// Field name
        name: String,
        /// Field value
        value: String,
    },
    /// A file field
    File {
        /// Field name
        name: String,
        /// File content and metadata
        file: FilePart,
    },
}

/// A multipart form body.
///
/// The boundary is chosen by the transport, never by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultipartForm {
    fields: Vec<MultipartField>,
}

impl MultipartForm {
    /// Creates an empty form.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Adds a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(MultipartField::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Adds a file field.
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, file: FilePart) -> Self {
        self.fields.push(MultipartField::File {
            name: name.into(),
            file,
        });
        self
    }

    /// Returns all fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[MultipartField] {
        &self.fields
    }

    /// Returns the total number of file bytes in the form.
    #[must_use]
    pub fn file_bytes(&self) -> u64 {
        self.fields
            .iter()
            .map(|f| match f {
                MultipartField::File { file, .. } => file.len() as u64,
                MultipartField::Text { .. } => 0,
            })
            .sum()
    }
}
