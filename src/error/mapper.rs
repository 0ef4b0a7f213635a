//! Error mapping utilities for HTTP status codes and API responses.

use std::time::Duration;
use serde::Deserialize;
use super::categories::*;
use super::types::StudyBuddyError;

/// Structured API error response from Vertex AI.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Detailed error information from API.
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
}

/// Maps HTTP status codes and response body to appropriate error variants.
///
/// The structured `{"error": {...}}` body is preferred; a plain-text body is
/// used verbatim as the message otherwise.
pub fn map_http_status_with_body(status: u16, body: &[u8]) -> StudyBuddyError {
    let (message, error_details) = match serde_json::from_slice::<ApiErrorResponse>(body) {
        Ok(error_response) => (error_response.error.message.clone(), Some(error_response.error)),
        Err(_) => (String::from_utf8_lossy(body).trim().to_string(), None),
    };

    match status {
        400 => {
            let details = error_details
                .as_ref()
                .map(|e| parse_validation_details(&e.details))
                .unwrap_or_default();

            StudyBuddyError::Request(RequestError::ValidationError { message, details })
        }

        401 => StudyBuddyError::Authentication(AuthenticationError::InvalidCredentials),

        403 => {
            if message.to_lowercase().contains("quota") {
                StudyBuddyError::Authentication(AuthenticationError::QuotaExceeded)
            } else {
                StudyBuddyError::Authentication(AuthenticationError::PermissionDenied { message })
            }
        }

        404 => StudyBuddyError::Resource(ResourceError::ModelNotFound {
            model: extract_resource_name(&message),
        }),

        413 => {
            let (size, max_size) = extract_size_info(&message);
            StudyBuddyError::Request(RequestError::PayloadTooLarge { size, max_size })
        }

        415 => StudyBuddyError::Request(RequestError::UnsupportedMediaType {
            mime_type: extract_mime_type(&message),
        }),

        // retry_after is filled in from headers by the response parser
        429 => StudyBuddyError::RateLimit(RateLimitError::TooManyRequests { retry_after: None }),

        503 => {
            if message.to_lowercase().contains("overload") {
                StudyBuddyError::Server(ServerError::ModelOverloaded {
                    model: extract_resource_name(&message),
                })
            } else {
                StudyBuddyError::Server(ServerError::ServiceUnavailable { retry_after: None })
            }
        }

        500..=599 => StudyBuddyError::Server(ServerError::InternalError { message }),

        _ => StudyBuddyError::Server(ServerError::InternalError {
            message: format!("HTTP {}: {}", status, message),
        }),
    }
}

/// Maps a canonical API status string (as found inside streamed error objects)
/// to an error variant.
pub fn map_api_error(error_status: &str, message: String) -> StudyBuddyError {
    match error_status {
        "INVALID_ARGUMENT" | "FAILED_PRECONDITION" => {
            StudyBuddyError::Request(RequestError::ValidationError {
                message,
                details: vec![],
            })
        }
        "UNAUTHENTICATED" => StudyBuddyError::Authentication(AuthenticationError::InvalidCredentials),
        "PERMISSION_DENIED" => {
            StudyBuddyError::Authentication(AuthenticationError::PermissionDenied { message })
        }
        "NOT_FOUND" => StudyBuddyError::Resource(ResourceError::ModelNotFound {
            model: extract_resource_name(&message),
        }),
        "RESOURCE_EXHAUSTED" => StudyBuddyError::RateLimit(RateLimitError::ResourceExhausted {
            retry_after: Some(Duration::from_secs(60)),
        }),
        "UNAVAILABLE" => StudyBuddyError::Server(ServerError::ServiceUnavailable {
            retry_after: Some(Duration::from_secs(30)),
        }),
        "DEADLINE_EXCEEDED" => StudyBuddyError::Network(NetworkError::Timeout),
        "INTERNAL" | "ABORTED" => StudyBuddyError::Server(ServerError::InternalError { message }),
        _ => StudyBuddyError::Server(ServerError::InternalError {
            message: format!("{}: {}", error_status, message),
        }),
    }
}

/// Extracts resource name from error message (simple heuristic).
fn extract_resource_name(message: &str) -> String {
    if let Some(found) = message
        .split_whitespace()
        .find(|s| s.contains("models/"))
    {
        return found
            .trim_matches(|c: char| !c.is_alphanumeric() && c != '/' && c != '-' && c != '_' && c != '.')
            .to_string();
    }

    for quote in ['\'', '"', '`'] {
        if let Some(start) = message.find(quote) {
            if let Some(end) = message[start + 1..].find(quote) {
                return message[start + 1..start + 1 + end].to_string();
            }
        }
    }

    "unknown".to_string()
}

/// Extracts size information from error message.
fn extract_size_info(message: &str) -> (usize, usize) {
    let numbers: Vec<usize> = message
        .split_whitespace()
        .filter_map(|s| s.trim_matches(|c: char| !c.is_numeric()).parse().ok())
        .collect();

    match numbers.as_slice() {
        [] => (0, 0),
        [size] => (*size, 0),
        [size, max_size, ..] => (*size, *max_size),
    }
}

/// Extracts MIME type from error message.
fn extract_mime_type(message: &str) -> String {
    for word in message.split_whitespace() {
        if ["image/", "video/", "audio/", "application/", "text/"]
            .iter()
            .any(|prefix| word.starts_with(prefix))
        {
            return word
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '/')
                .to_string();
        }
    }
    "unknown".to_string()
}

/// Parses validation details from error response details array.
fn parse_validation_details(details: &[serde_json::Value]) -> Vec<ValidationDetail> {
    let mut result = Vec::new();

    for detail in details {
        let Some(obj) = detail.as_object() else {
            continue;
        };

        // BadRequest details nest their violations one level down.
        if let Some(violations) = obj.get("fieldViolations").and_then(|v| v.as_array()) {
            result.extend(parse_validation_details(violations));
            continue;
        }

        let field = obj
            .get("field")
            .or_else(|| obj.get("fieldPath"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");

        let description = obj
            .get("description")
            .or_else(|| obj.get("message"))
            .and_then(|v| v.as_str())
            .unwrap_or("");

        if !description.is_empty() {
            result.push(ValidationDetail {
                field: field.to_string(),
                description: description.to_string(),
            });
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_http_status_401() {
        let error = map_http_status_with_body(401, b"Request had invalid authentication credentials");
        assert!(matches!(
            error,
            StudyBuddyError::Authentication(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_map_http_status_403_quota() {
        let body = r#"{"error":{"code":403,"message":"Quota exceeded for aiplatform.googleapis.com","status":"PERMISSION_DENIED"}}"#;
        let error = map_http_status_with_body(403, body.as_bytes());
        assert!(matches!(
            error,
            StudyBuddyError::Authentication(AuthenticationError::QuotaExceeded)
        ));
    }

    #[test]
    fn test_map_http_status_403_permission() {
        let body = r#"{"error":{"code":403,"message":"Permission 'aiplatform.endpoints.predict' denied","status":"PERMISSION_DENIED"}}"#;
        let error = map_http_status_with_body(403, body.as_bytes());
        assert!(matches!(
            error,
            StudyBuddyError::Authentication(AuthenticationError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn test_map_http_status_429() {
        let error = map_http_status_with_body(429, b"Rate limit exceeded");
        assert!(matches!(
            error,
            StudyBuddyError::RateLimit(RateLimitError::TooManyRequests { .. })
        ));
    }

    #[test]
    fn test_map_http_status_503() {
        let error = map_http_status_with_body(503, b"Service unavailable");
        assert!(matches!(
            error,
            StudyBuddyError::Server(ServerError::ServiceUnavailable { .. })
        ));
    }

    #[test]
    fn test_map_http_status_503_overloaded() {
        let error = map_http_status_with_body(503, b"The model is overloaded");
        assert!(matches!(
            error,
            StudyBuddyError::Server(ServerError::ModelOverloaded { .. })
        ));
    }

    #[test]
    fn test_map_http_status_with_body_structured() {
        let body = r#"{"error":{"code":400,"message":"Invalid parameter","status":"INVALID_ARGUMENT","details":[{"@type":"type.googleapis.com/google.rpc.BadRequest","fieldViolations":[{"field":"contents[0].parts[3].file_data.file_uri","description":"Unsupported URI"}]}]}}"#;
        let error = map_http_status_with_body(400, body.as_bytes());
        match error {
            StudyBuddyError::Request(RequestError::ValidationError { message, details }) => {
                assert_eq!(message, "Invalid parameter");
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "contents[0].parts[3].file_data.file_uri");
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_map_http_status_404_model() {
        let body = r#"{"error":{"message":"Publisher Model `projects/p/locations/global/publishers/google/models/gemini-fake` was not found"}}"#;
        let error = map_http_status_with_body(404, body.as_bytes());
        match error {
            StudyBuddyError::Resource(ResourceError::ModelNotFound { model }) => {
                assert_eq!(model, "projects/p/locations/global/publishers/google/models/gemini-fake");
            }
            other => panic!("Expected ModelNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_map_http_status_413_payload_too_large() {
        let body = r#"{"error":{"message":"Payload size 1000000 exceeds maximum 500000"}}"#;
        let error = map_http_status_with_body(413, body.as_bytes());
        assert_eq!(
            error,
            StudyBuddyError::Request(RequestError::PayloadTooLarge {
                size: 1_000_000,
                max_size: 500_000
            })
        );
    }

    #[test]
    fn test_map_http_status_415_unsupported_media_type() {
        let body = r#"{"error":{"message":"Unsupported media type: image/bmp"}}"#;
        let error = map_http_status_with_body(415, body.as_bytes());
        assert_eq!(
            error,
            StudyBuddyError::Request(RequestError::UnsupportedMediaType {
                mime_type: "image/bmp".to_string()
            })
        );
    }

    #[test]
    fn test_map_http_status_unknown_code() {
        let error = map_http_status_with_body(418, b"teapot");
        assert_eq!(
            error,
            StudyBuddyError::Server(ServerError::InternalError {
                message: "HTTP 418: teapot".to_string()
            })
        );
    }

    #[test]
    fn test_extract_resource_name_with_quotes() {
        assert_eq!(extract_resource_name("Model 'gemini-pro' not found"), "gemini-pro");
        assert_eq!(extract_resource_name("nothing to see"), "unknown");
    }

    #[test]
    fn test_map_api_error_resource_exhausted() {
        let error = map_api_error("RESOURCE_EXHAUSTED", "Quota exceeded".to_string());
        assert!(error.is_retryable());
        assert!(matches!(
            error,
            StudyBuddyError::RateLimit(RateLimitError::ResourceExhausted { .. })
        ));
    }

    #[test]
    fn test_map_api_error_unknown_status() {
        let error = map_api_error("CANCELLED", "client went away".to_string());
        assert_eq!(
            error,
            StudyBuddyError::Server(ServerError::InternalError {
                message: "CANCELLED: client went away".to_string()
            })
        );
    }
}
