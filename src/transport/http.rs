//! Wire-level request and response values exchanged with Vertex AI.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;

use super::error::TransportError;

/// Looks a header up by name, ignoring ASCII case.
fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// The verbs the generation endpoints use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Read-only calls.
    Get,
    /// `generateContent` and `streamGenerateContent`.
    Post,
}

/// An outgoing call, fully resolved: absolute URL, auth header, JSON body.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Verb.
    pub method: HttpMethod,
    /// Absolute URL including the API version segment.
    pub url: String,
    /// Headers as sent; names keep the case they were inserted with.
    pub headers: HashMap<String, String>,
    /// Serialized JSON body, if any.
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A fully buffered reply.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Headers with their values decoded as UTF-8; others are dropped.
    pub headers: HashMap<String, String>,
    /// Raw body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Body of a streaming reply, delivered as it arrives.
pub type ChunkedStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Seam between the client and the network, replaced by a mock in tests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends `request` and buffers the whole reply, whatever its status.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Sends `request` and hands back the body as a stream.
    ///
    /// A non-success status is reported as [`TransportError::Status`] before
    /// any stream exists, so callers can retry it like a buffered failure.
    async fn send_streaming(&self, request: HttpRequest) -> Result<ChunkedStream, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_ignores_case() {
        let response = HttpResponse {
            status: 429,
            headers: HashMap::from([("Retry-After".to_string(), "7".to_string())]),
            body: Bytes::new(),
        };

        assert_eq!(response.header("retry-after"), Some("7"));
        assert_eq!(response.header("x-request-id"), None);
        assert!(!response.is_success());
    }

    #[test]
    fn test_request_header_lookup() {
        let request = HttpRequest {
            method: HttpMethod::Post,
            url: "https://aiplatform.googleapis.com/v1/x".to_string(),
            headers: HashMap::from([("Content-Type".to_string(), "application/json".to_string())]),
            body: None,
        };

        assert_eq!(request.header("content-type"), Some("application/json"));
    }
}
