//! Resilience layer for the Vertex AI client.
//!
//! Only retries live here. They wrap the single `generateContent` call and the
//! opening of a `streamGenerateContent` call, never a stream that has already
//! produced output.

mod retry;

pub use crate::config::RetryConfig;
pub use retry::RetryExecutor;
