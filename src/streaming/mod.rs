//! Streaming support for `streamGenerateContent` responses.
//!
//! Vertex AI streams a single JSON array whose elements arrive over time:
//!
//! ```json
//! [{"candidates":[...]},
//! {"candidates":[...],"usageMetadata":{...}}]
//! ```
//!
//! [`ResponseChunkParser`] turns the raw body stream into a stream of
//! [`GenerateContentResponse`](crate::types::GenerateContentResponse)
//! values, one per array element, without waiting for the closing bracket.

mod chunked_json;

pub use chunked_json::ResponseChunkParser;
