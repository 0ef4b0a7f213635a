//! HTTP response parsing for the Vertex AI API.
//!
//! Turns raw [`HttpResponse`]s into typed bodies or [`StudyBuddyError`]s and
//! pulls diagnostic metadata (retry hints, request ids) out of headers.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{map_http_status_with_body, RateLimitError, ServerError, StudyBuddyError};
use super::http::HttpResponse;

/// Header names that may carry a server-side request id.
const REQUEST_ID_HEADERS: [&str; 3] = ["x-request-id", "x-goog-request-id", "request-id"];

/// Parser for HTTP responses from the Vertex AI API.
pub struct ResponseParser;

impl ResponseParser {
    /// Deserializes a 2xx response body, or maps anything else to an error.
    ///
    /// # Example
    ///
    /// ```
    /// use study_buddy::transport::{HttpResponse, ResponseParser};
    /// use bytes::Bytes;
    /// use serde::Deserialize;
    /// use std::collections::HashMap;
    ///
    /// #[derive(Deserialize)]
    /// struct Model {
    ///     name: String,
    /// }
    ///
    /// let response = HttpResponse {
    ///     status: 200,
    ///     headers: HashMap::new(),
    ///     body: Bytes::from(r#"{"name":"gemini-2.5-pro"}"#),
    /// };
    ///
    /// let parsed: Model = ResponseParser::parse_response(response).unwrap();
    /// assert_eq!(parsed.name, "gemini-2.5-pro");
    /// ```
    pub fn parse_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, StudyBuddyError> {
        if response.is_success() {
            Ok(serde_json::from_slice(&response.body)?)
        } else {
            Err(Self::parse_error_response(response))
        }
    }

    /// Maps an error response to a [`StudyBuddyError`].
    ///
    /// Status and body are classified by [`map_http_status_with_body`]; a
    /// `Retry-After` header then overrides the retry hint of rate-limit and
    /// unavailable errors.
    pub fn parse_error_response(response: HttpResponse) -> StudyBuddyError {
        let header_retry_after = Self::parse_retry_after(&response.headers);
        let mut error = map_http_status_with_body(response.status, &response.body);

        if let Some(delay) = header_retry_after {
            match &mut error {
                StudyBuddyError::RateLimit(RateLimitError::TooManyRequests { retry_after })
                | StudyBuddyError::RateLimit(RateLimitError::ResourceExhausted { retry_after })
                | StudyBuddyError::Server(ServerError::ServiceUnavailable { retry_after }) => {
                    *retry_after = Some(delay);
                }
                _ => {}
            }
        }

        if let Some(request_id) = Self::extract_request_id(&response.headers) {
            tracing::debug!(
                request_id = %request_id,
                status = response.status,
                error = %error,
                "Vertex AI returned an error response"
            );
        }

        error
    }

    /// Parses the `Retry-After` header, accepting the delay-seconds form only.
    ///
    /// ```
    /// use study_buddy::transport::ResponseParser;
    /// use std::collections::HashMap;
    /// use std::time::Duration;
    ///
    /// let headers = HashMap::from([("Retry-After".to_string(), "60".to_string())]);
    /// assert_eq!(ResponseParser::parse_retry_after(&headers), Some(Duration::from_secs(60)));
    /// ```
    pub fn parse_retry_after(headers: &HashMap<String, String>) -> Option<Duration> {
        headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("retry-after"))
            .and_then(|(_, value)| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    }

    /// Extracts a request id from response headers, if the server sent one.
    pub fn extract_request_id(headers: &HashMap<String, String>) -> Option<String> {
        headers
            .iter()
            .find(|(key, _)| {
                REQUEST_ID_HEADERS
                    .iter()
                    .any(|candidate| key.eq_ignore_ascii_case(candidate))
            })
            .map(|(_, value)| value.clone())
    }
}
