//! Reading uploaded documents from their transient location.

use bytes::Bytes;
use std::path::Path;

use crate::error::{DocumentError, StudyBuddyResult};
use super::request::DEFAULT_DOCUMENT_NAME;

/// Reads the whole document at `path` into memory.
///
/// # Errors
///
/// [`DocumentError::Read`] when the file cannot be opened or read.
pub async fn read_document(path: impl AsRef<Path>) -> StudyBuddyResult<Bytes> {
    let path = path.as_ref();

    let bytes = tokio::fs::read(path).await.map_err(|e| DocumentError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    tracing::debug!(path = %path.display(), size = bytes.len(), "Read uploaded document");

    Ok(Bytes::from(bytes))
}

/// The file name component of `path`, or the default document name.
pub fn document_name_from_path(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_DOCUMENT_NAME.to_string())
}
