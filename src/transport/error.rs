//! Failures below the API layer.

use bytes::Bytes;
use std::collections::HashMap;

/// A request that never produced a usable reply.
///
/// Converted into [`StudyBuddyError`](crate::error::StudyBuddyError) at the
/// client boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// The connection could not be established or was refused.
    #[error("Connection error: {0}")]
    Connection(String),
    /// The request or connect timeout elapsed.
    #[error("Timeout")]
    Timeout,
    /// The body could not be read, possibly after part of it arrived.
    #[error("Body error: {0}")]
    Body(String),
    /// A streaming request was answered with a non-success status.
    #[error("HTTP error {status}")]
    Status {
        /// Status code.
        status: u16,
        /// Reply headers.
        headers: HashMap<String, String>,
        /// Buffered error body.
        body: Bytes,
    },
}
