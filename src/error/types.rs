//! Main error type for the study-guide service.

use std::time::Duration;
use thiserror::Error;
use super::categories::*;
use crate::transport::{HttpResponse, ResponseParser, TransportError};

/// Result type alias for study-guide operations.
pub type StudyBuddyResult<T> = Result<T, StudyBuddyError>;

/// Top-level error type.
///
/// `Configuration` and `Input` are raised before the model is contacted.
/// Every other variant is a generation failure: the call was attempted and
/// failed or was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StudyBuddyError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Missing input: {0}")]
    Input(#[from] MissingInputError),

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Rate limit error: {0}")]
    RateLimit(#[from] RateLimitError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

impl StudyBuddyError {
    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StudyBuddyError::RateLimit(_)
                | StudyBuddyError::Network(NetworkError::Timeout)
                | StudyBuddyError::Network(NetworkError::ConnectionFailed { .. })
                | StudyBuddyError::Server(ServerError::ServiceUnavailable { .. })
                | StudyBuddyError::Server(ServerError::ModelOverloaded { .. })
        )
    }

    /// Returns the retry-after duration if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            StudyBuddyError::RateLimit(e) => e.retry_after(),
            StudyBuddyError::Server(ServerError::ServiceUnavailable { retry_after }) => *retry_after,
            _ => None,
        }
    }

    /// Returns true if the model was contacted (or about to be) and the call failed.
    pub fn is_generation_failure(&self) -> bool {
        !matches!(
            self,
            StudyBuddyError::Configuration(_) | StudyBuddyError::Input(_)
        )
    }
}

impl From<TransportError> for StudyBuddyError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connection(message) => {
                StudyBuddyError::Network(NetworkError::ConnectionFailed { message })
            }
            TransportError::Timeout => StudyBuddyError::Network(NetworkError::Timeout),
            TransportError::Body(message) => {
                StudyBuddyError::Response(ResponseError::StreamInterrupted { message })
            }
            TransportError::Status { status, headers, body } => {
                ResponseParser::parse_error_response(HttpResponse { status, headers, body })
            }
        }
    }
}

impl From<serde_json::Error> for StudyBuddyError {
    fn from(err: serde_json::Error) -> Self {
        StudyBuddyError::Response(ResponseError::DeserializationError {
            message: err.to_string(),
        })
    }
}

impl From<url::ParseError> for StudyBuddyError {
    fn from(err: url::ParseError) -> Self {
        StudyBuddyError::Configuration(ConfigurationError::InvalidBaseUrl {
            url: err.to_string(),
        })
    }
}
