//! Incremental parser for the JSON-array streaming format.

use futures::stream::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::{map_api_error, ApiErrorResponse, ResponseError, StudyBuddyError, StudyBuddyResult};
use crate::transport::ChunkedStream;
use crate::types::GenerateContentResponse;

/// Parser for the chunked JSON array returned by `streamGenerateContent`.
///
/// Handles objects split across any number of network chunks (including
/// splits inside a multi-byte UTF-8 sequence), array brackets and comma
/// separators, and `{"error": {...}}` elements that the service emits when a
/// stream fails after it has started.
///
/// The parser is fused after the first error.
pub struct ResponseChunkParser {
    inner: ChunkedStream,
    /// Bytes that do not yet form complete UTF-8.
    pending: Vec<u8>,
    /// Decoded text not yet consumed as an object.
    buffer: String,
    closed: bool,
    finished: bool,
    failed: bool,
}

impl ResponseChunkParser {
    /// Create a new chunk parser over a response body stream.
    pub fn new(inner: ChunkedStream) -> Self {
        Self {
            inner,
            pending: Vec::new(),
            buffer: String::new(),
            closed: false,
            finished: false,
            failed: false,
        }
    }

    /// Feed raw bytes and return every complete element now available.
    pub fn feed(&mut self, data: &[u8]) -> Vec<StudyBuddyResult<GenerateContentResponse>> {
        let mut results = Vec::new();

        if let Err(e) = self.decode(data) {
            self.failed = true;
            results.push(Err(e));
            return results;
        }

        while let Some(result) = self.try_extract_object() {
            let is_err = result.is_err();
            results.push(result);
            if is_err {
                self.failed = true;
                break;
            }
        }

        results
    }

    /// Appends `data` to the text buffer, holding back an incomplete trailing
    /// UTF-8 sequence until the next chunk.
    fn decode(&mut self, data: &[u8]) -> StudyBuddyResult<()> {
        self.pending.extend_from_slice(data);

        let valid_up_to = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(_) => {
                return Err(StudyBuddyError::Response(ResponseError::MalformedChunk {
                    message: "Invalid UTF-8 in stream".to_string(),
                }));
            }
        };

        let rest = self.pending.split_off(valid_up_to);
        let complete = std::mem::replace(&mut self.pending, rest);
        self.buffer.push_str(&String::from_utf8_lossy(&complete));
        Ok(())
    }

    /// Try to extract one complete element from the buffer.
    ///
    /// Returns `None` when more data is needed or the array has closed.
    fn try_extract_object(&mut self) -> Option<StudyBuddyResult<GenerateContentResponse>> {
        loop {
            let trimmed = self
                .buffer
                .trim_start_matches(|c: char| c.is_whitespace() || c == ',');
            let skipped = self.buffer.len() - trimmed.len();
            self.buffer.drain(..skipped);

            match self.buffer.chars().next() {
                None => return None,
                Some('[') => {
                    self.buffer.drain(..1);
                }
                Some(']') => {
                    self.buffer.drain(..1);
                    self.closed = true;
                }
                Some('{') => {
                    let end = find_object_end(&self.buffer)?;
                    let object: String = self.buffer.drain(..end).collect();
                    return Some(parse_element(&object));
                }
                Some(other) => {
                    return Some(Err(StudyBuddyError::Response(ResponseError::MalformedChunk {
                        message: format!("Unexpected character {:?} in stream", other),
                    })));
                }
            }
        }
    }

    /// Reports whatever is left once the body stream has ended.
    fn finish(&mut self) -> Option<StudyBuddyResult<GenerateContentResponse>> {
        if let Some(result) = self.try_extract_object() {
            return Some(result);
        }

        if !self.pending.is_empty() || !self.buffer.trim().is_empty() {
            self.failed = true;
            return Some(Err(StudyBuddyError::Response(ResponseError::StreamInterrupted {
                message: "Stream ended inside a JSON element".to_string(),
            })));
        }

        None
    }

    /// Whether the closing `]` of the array has been seen.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Parses one array element, recognising in-stream error objects.
fn parse_element(object: &str) -> StudyBuddyResult<GenerateContentResponse> {
    let value: serde_json::Value = serde_json::from_str(object).map_err(|e| {
        StudyBuddyError::Response(ResponseError::MalformedChunk {
            message: format!("Failed to parse chunk: {}", e),
        })
    })?;

    if value.get("error").is_some() {
        let api_error: ApiErrorResponse = serde_json::from_value(value)?;
        return Err(map_api_error(&api_error.error.status, api_error.error.message));
    }

    Ok(serde_json::from_value(value)?)
}

/// Returns the byte length of the complete JSON object at the start of
/// `input`, or `None` if it is not complete yet.
///
/// Braces and brackets inside strings are ignored, honoring escapes.
fn find_object_end(input: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, byte) in input.bytes().enumerate() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match byte {
            b'\\' if in_string => escape_next = true,
            b'"' => in_string = !in_string,
            b'{' | b'[' if !in_string => depth += 1,
            b'}' | b']' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

impl Stream for ResponseChunkParser {
    type Item = StudyBuddyResult<GenerateContentResponse>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.failed {
            return Poll::Ready(None);
        }

        loop {
            if let Some(result) = self.try_extract_object() {
                if result.is_err() {
                    self.failed = true;
                }
                return Poll::Ready(Some(result));
            }

            if self.finished {
                return Poll::Ready(self.finish());
            }

            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    if let Err(e) = self.decode(&bytes) {
                        self.failed = true;
                        return Poll::Ready(Some(Err(e)));
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    self.failed = true;
                    return Poll::Ready(Some(Err(e.into())));
                }
                Poll::Ready(None) => {
                    self.finished = true;
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
