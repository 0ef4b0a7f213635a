//! Test doubles for the transport and the generation client.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::client::{FragmentStream, GenerationClient};
use crate::error::{StudyBuddyError, StudyBuddyResult};
use crate::guide::GenerationRequest;
use crate::transport::{ChunkedStream, HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock HTTP transport for testing.
///
/// Responses are served in the order they were enqueued; every request is
/// recorded for later verification. Streaming bodies are scripted chunk by
/// chunk and may contain a transport error part-way through.
///
/// # Example
///
/// ```
/// use study_buddy::mocks::MockHttpTransport;
/// use study_buddy::transport::{HttpMethod, HttpRequest, HttpTransport};
/// use std::collections::HashMap;
///
/// # async fn example() {
/// let transport = MockHttpTransport::new();
/// transport.enqueue_json_response(200, r#"{"candidates": []}"#);
///
/// let request = HttpRequest {
///     method: HttpMethod::Post,
///     url: "https://example.com".to_string(),
///     headers: HashMap::new(),
///     body: None,
/// };
///
/// let response = transport.send(request).await.unwrap();
/// assert_eq!(response.status, 200);
/// transport.verify_request_count(1);
/// # }
/// ```
pub struct MockHttpTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    streaming_responses: Mutex<VecDeque<Result<Vec<Result<Bytes, TransportError>>, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockHttpTransport {
    /// Create a new mock HTTP transport.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            streaming_responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Enqueue a response to be returned by the next request.
    pub fn enqueue_response(&self, response: Result<HttpResponse, TransportError>) {
        lock(&self.responses).push_back(response);
    }

    /// Enqueue a JSON response with the given status code and body.
    pub fn enqueue_json_response(&self, status: u16, body: &str) {
        self.enqueue_json_response_with_headers(status, body, HashMap::new());
    }

    /// Enqueue a JSON response with extra headers (e.g. `retry-after`).
    pub fn enqueue_json_response_with_headers(
        &self,
        status: u16,
        body: &str,
        extra_headers: HashMap<String, String>,
    ) {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers.extend(extra_headers);

        self.enqueue_response(Ok(HttpResponse {
            status,
            body: Bytes::from(body.to_string()),
            headers,
        }));
    }

    /// Enqueue an error response.
    pub fn enqueue_error(&self, error: TransportError) {
        self.enqueue_response(Err(error));
    }

    /// Enqueue a streaming response whose body arrives as `chunks`.
    pub fn enqueue_streaming_response(&self, chunks: Vec<Bytes>) {
        lock(&self.streaming_responses).push_back(Ok(chunks.into_iter().map(Ok).collect()));
    }

    /// Enqueue a streaming response that fails with `error` after `chunks`.
    pub fn enqueue_interrupted_stream(&self, chunks: Vec<Bytes>, error: TransportError) {
        let mut body: Vec<_> = chunks.into_iter().map(Ok).collect();
        body.push(Err(error));
        lock(&self.streaming_responses).push_back(Ok(body));
    }

    /// Enqueue a failure to open a stream.
    pub fn enqueue_streaming_error(&self, error: TransportError) {
        lock(&self.streaming_responses).push_back(Err(error));
    }

    /// Get all requests that were made.
    pub fn get_requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Get the last request that was made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    /// The body of the last request, parsed as JSON.
    pub fn last_request_json(&self) -> Option<serde_json::Value> {
        self.last_request()
            .and_then(|request| request.body)
            .and_then(|body| serde_json::from_slice(&body).ok())
    }

    /// Verify that exactly `expected` requests were made.
    pub fn verify_request_count(&self, expected: usize) {
        let actual = lock(&self.requests).len();
        assert_eq!(actual, expected, "Expected {} requests, got {}", expected, actual);
    }

    /// Verify that a request was made with the expected method and URL.
    pub fn verify_request(&self, index: usize, method: HttpMethod, url_contains: &str) {
        let requests = lock(&self.requests);
        assert!(index < requests.len(), "No request at index {}", index);

        let request = &requests[index];
        assert_eq!(request.method, method, "Expected method {:?}, got {:?}", method, request.method);
        assert!(
            request.url.contains(url_contains),
            "Expected URL to contain '{}', got '{}'",
            url_contains,
            request.url
        );
    }

    /// Verify that a request contains a specific header.
    pub fn verify_header(&self, index: usize, header_name: &str, header_value: &str) {
        let requests = lock(&self.requests);
        assert!(index < requests.len(), "No request at index {}", index);

        let actual_value = requests[index].header(header_name);
        assert_eq!(
            actual_value,
            Some(header_value),
            "Expected header '{}' to be '{}', got {:?}",
            header_name,
            header_value,
            actual_value
        );
    }
}

impl Default for MockHttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(request);

        lock(&self.responses).pop_front().unwrap_or_else(|| {
            Err(TransportError::Connection(
                "No response configured in MockHttpTransport".into(),
            ))
        })
    }

    async fn send_streaming(&self, request: HttpRequest) -> Result<ChunkedStream, TransportError> {
        lock(&self.requests).push(request);

        let chunks = lock(&self.streaming_responses).pop_front().unwrap_or_else(|| {
            Err(TransportError::Connection(
                "No streaming response configured in MockHttpTransport".into(),
            ))
        })?;

        Ok(Box::pin(stream::iter(chunks)))
    }
}

enum Script {
    Fragments {
        fragments: Vec<String>,
        failure: Option<StudyBuddyError>,
    },
    FailOnOpen(StudyBuddyError),
}

/// Scripted [`GenerationClient`] that also records how it was called.
///
/// `complete` returns the concatenated fragments (or the scripted failure);
/// `stream` yields them one by one.
pub struct ScriptedGenerationClient {
    script: Script,
    complete_calls: AtomicUsize,
    stream_calls: AtomicUsize,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl ScriptedGenerationClient {
    fn from_script(script: Script) -> Self {
        Self {
            script,
            complete_calls: AtomicUsize::new(0),
            stream_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A client that succeeds with `fragments`.
    pub fn with_fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_script(Script::Fragments {
            fragments: fragments.into_iter().map(Into::into).collect(),
            failure: None,
        })
    }

    /// A client that yields `fragments` and then fails with `error`.
    pub fn failing_after<I, S>(fragments: I, error: StudyBuddyError) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_script(Script::Fragments {
            fragments: fragments.into_iter().map(Into::into).collect(),
            failure: Some(error),
        })
    }

    /// A client whose every call fails before producing anything.
    pub fn failing_on_open(error: StudyBuddyError) -> Self {
        Self::from_script(Script::FailOnOpen(error))
    }

    /// Number of `complete` calls.
    pub fn complete_calls(&self) -> usize {
        self.complete_calls.load(Ordering::SeqCst)
    }

    /// Number of `stream` calls.
    pub fn stream_calls(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }

    /// Number of calls of either kind.
    pub fn total_calls(&self) -> usize {
        self.complete_calls() + self.stream_calls()
    }

    /// The most recent request received.
    pub fn last_request(&self) -> Option<GenerationRequest> {
        lock(&self.last_request).clone()
    }

    fn record(&self, request: &GenerationRequest) {
        *lock(&self.last_request) = Some(request.clone());
    }
}

#[async_trait]
impl GenerationClient for ScriptedGenerationClient {
    async fn complete(&self, request: &GenerationRequest) -> StudyBuddyResult<String> {
        self.complete_calls.fetch_add(1, Ordering::SeqCst);
        self.record(request);

        match &self.script {
            Script::FailOnOpen(error) => Err(error.clone()),
            Script::Fragments { failure: Some(error), .. } => Err(error.clone()),
            Script::Fragments { fragments, failure: None } => Ok(fragments.concat()),
        }
    }

    async fn stream(&self, request: &GenerationRequest) -> StudyBuddyResult<FragmentStream> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        self.record(request);

        match &self.script {
            Script::FailOnOpen(error) => Err(error.clone()),
            Script::Fragments { fragments, failure } => {
                let items: Vec<StudyBuddyResult<String>> = fragments
                    .iter()
                    .cloned()
                    .map(Ok)
                    .chain(failure.clone().map(Err))
                    .collect();
                Ok(Box::pin(stream::iter(items)))
            }
        }
    }
}
