//! Error category types for granular error handling.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while building the generation client from configuration.
///
/// These are fatal for a request but never for the process: the client handle
/// keeps the error and every submission is answered with an error report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Missing project id (set GOOGLE_PROJECT_ID)")]
    MissingProjectId,

    #[error("Missing credentials (set GOOGLE_ACCESS_TOKEN or GOOGLE_API_KEY)")]
    MissingCredentials,

    #[error("Missing model id")]
    MissingModel,

    #[error("Invalid base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("HTTP client initialization failed: {message}")]
    ClientInit { message: String },
}

/// Required user input is absent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MissingInputError {
    #[error("a video reference is required")]
    VideoReference,

    #[error("a non-empty document is required")]
    Document,
}

/// Authentication-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid or expired credentials")]
    InvalidCredentials,

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Quota exceeded for project")]
    QuotaExceeded,
}

/// Request rejected by the service as malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Validation error: {message}")]
    ValidationError { message: String, details: Vec<ValidationDetail> },

    #[error("Payload too large: {size} bytes (max: {max_size})")]
    PayloadTooLarge { size: usize, max_size: usize },

    #[error("Unsupported media type: {mime_type}")]
    UnsupportedMediaType { mime_type: String },
}

/// Validation detail for field-level errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetail {
    pub field: String,
    pub description: String,
}

/// Rate limiting errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("Too many requests")]
    TooManyRequests { retry_after: Option<Duration> },

    #[error("Resource exhausted")]
    ResourceExhausted { retry_after: Option<Duration> },
}

impl RateLimitError {
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            RateLimitError::TooManyRequests { retry_after }
            | RateLimitError::ResourceExhausted { retry_after } => *retry_after,
        }
    }
}

/// Network-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timed out")]
    Timeout,
}

/// Server-side errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServerError {
    #[error("Internal server error: {message}")]
    InternalError { message: String },

    #[error("Service unavailable")]
    ServiceUnavailable { retry_after: Option<Duration> },

    #[error("Model overloaded: {model}")]
    ModelOverloaded { model: String },
}

/// Response parsing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    #[error("Failed to deserialize response: {message}")]
    DeserializationError { message: String },

    #[error("Stream interrupted: {message}")]
    StreamInterrupted { message: String },

    #[error("Malformed chunk: {message}")]
    MalformedChunk { message: String },

    #[error("The model returned an empty response")]
    EmptyResponse,
}

/// Content safety errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("Content blocked due to safety: {reason}")]
    SafetyBlocked {
        reason: String,
        safety_ratings: Vec<SafetyRatingInfo>,
    },

    #[error("Content blocked due to recitation")]
    RecitationBlocked,

    #[error("Prohibited content detected")]
    ProhibitedContent,
}

/// Information about a safety rating for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyRatingInfo {
    pub category: String,
    pub probability: String,
}

/// Resource-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Model not found: {model}")]
    ModelNotFound { model: String },
}

/// Failures reading an uploaded document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Failed to read document {path}: {message}")]
    Read { path: String, message: String },
}
