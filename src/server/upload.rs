//! Reading the submission form.

use axum::extract::Multipart;
use bytes::Bytes;

use super::error::ServerError;
use crate::guide::{GenerationRequest, DEFAULT_DOCUMENT_NAME};

/// Form field holding the video URL.
pub const VIDEO_URL_FIELD: &str = "video_url";

/// Form field holding the PDF upload.
pub const DOCUMENT_FIELD: &str = "document";

/// Reads `video_url` and `document` from the form into a request.
///
/// Unknown fields are ignored. The document is read fully into memory.
pub(crate) async fn read_submission(mut multipart: Multipart) -> Result<GenerationRequest, ServerError> {
    let mut video_reference = String::new();
    let mut document = Bytes::new();
    let mut document_name = DEFAULT_DOCUMENT_NAME.to_string();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            VIDEO_URL_FIELD => {
                video_reference = field.text().await?;
            }
            DOCUMENT_FIELD => {
                if let Some(name) = field.file_name().filter(|name| !name.is_empty()) {
                    document_name = name.to_string();
                }
                document = field.bytes().await?;

                tracing::debug!(
                    document_name = %document_name,
                    size = document.len(),
                    "Received document upload"
                );
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown form field");
            }
        }
    }

    Ok(GenerationRequest::new(video_reference, document, document_name)?)
}
