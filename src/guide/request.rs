//! The validated unit of work handed to a generation client.

use bytes::Bytes;

use crate::error::MissingInputError;

/// File name used when an upload does not carry one.
pub const DEFAULT_DOCUMENT_NAME: &str = "document.pdf";

/// One submission: a video reference plus the bytes of a PDF document.
///
/// Only constructible through [`GenerationRequest::new`], so a value of this
/// type always has a non-blank video reference and a non-empty document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    video_reference: String,
    document: Bytes,
    document_name: String,
}

impl GenerationRequest {
    /// Validates the inputs and builds a request.
    ///
    /// The video reference is trimmed but otherwise opaque; neither its URL
    /// format nor the document's file type is checked.
    ///
    /// # Errors
    ///
    /// [`MissingInputError::VideoReference`] if the reference is empty or only
    /// whitespace, [`MissingInputError::Document`] if the document is empty.
    ///
    /// ```
    /// use study_buddy::guide::GenerationRequest;
    /// use study_buddy::error::MissingInputError;
    ///
    /// let err = GenerationRequest::new("", &b"%PDF-1.7"[..], "ch1.pdf").unwrap_err();
    /// assert_eq!(err, MissingInputError::VideoReference);
    /// ```
    pub fn new(
        video_reference: impl Into<String>,
        document: impl Into<Bytes>,
        document_name: impl Into<String>,
    ) -> Result<Self, MissingInputError> {
        let video_reference = video_reference.into().trim().to_string();
        let document = document.into();

        if video_reference.is_empty() {
            return Err(MissingInputError::VideoReference);
        }
        if document.is_empty() {
            return Err(MissingInputError::Document);
        }

        let document_name = document_name.into();
        let document_name = if document_name.trim().is_empty() {
            DEFAULT_DOCUMENT_NAME.to_string()
        } else {
            document_name
        };

        Ok(Self {
            video_reference,
            document,
            document_name,
        })
    }

    /// The video reference (a YouTube URL in practice).
    pub fn video_reference(&self) -> &str {
        &self.video_reference
    }

    /// The document bytes.
    pub fn document(&self) -> &Bytes {
        &self.document
    }

    /// The document's display name.
    pub fn document_name(&self) -> &str {
        &self.document_name
    }
}
