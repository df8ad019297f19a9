//! Incoming upload extraction.

use axum::body::Bytes;
use axum::extract::Multipart;
use reqwest::multipart::Part;

use crate::relay::error::UploadError;

/// Name of the multipart field the client puts the image in.
pub const FILE_FIELD: &str = "file";

/// A file received from the client, held only for the current request.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Original filename, if the client sent one.
    pub file_name: Option<String>,
    /// Declared content type, if the client sent one.
    pub content_type: Option<String>,
    /// File contents.
    pub data: Bytes,
}

impl Upload {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            file_name: None,
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Take the first file part named `file` from a multipart request.
    ///
    /// Other fields are skipped, as is a plain text field named `file`: only
    /// a part carrying a filename counts as an uploaded file. The field body
    /// is read once and never re-read.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, UploadError> {
        while let Some(field) = multipart.next_field().await? {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }
            let Some(file_name) = field.file_name().map(str::to_owned) else {
                continue;
            };

            let content_type = field.content_type().map(str::to_owned);
            let data = field.bytes().await?;

            return Ok(Self {
                file_name: Some(file_name),
                content_type,
                data,
            });
        }

        Err(UploadError::MissingFile)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Re-encode as an outbound multipart part.
    ///
    /// Only the bytes travel upstream. The part is always named after the
    /// field and carries no content type, whatever the client declared.
    pub(crate) fn into_part(self) -> Part {
        let length = self.data.len() as u64;
        Part::stream_with_length(self.data, length).file_name(FILE_FIELD)
    }
}
