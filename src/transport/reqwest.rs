//! Production transport over a pooled `reqwest` client.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response};
use std::collections::HashMap;
use std::time::Duration;

use super::error::TransportError;
use super::http::{ChunkedStream, HttpMethod, HttpRequest, HttpResponse, HttpTransport};

/// Where in the exchange a `reqwest` failure happened.
#[derive(Clone, Copy)]
enum Phase {
    Connect,
    Body,
}

fn classify(phase: Phase, error: &reqwest::Error) -> TransportError {
    if error.is_timeout() {
        return TransportError::Timeout;
    }
    match phase {
        Phase::Connect => TransportError::Connection(error.to_string()),
        Phase::Body => TransportError::Body(error.to_string()),
    }
}

fn to_header_map(headers: HashMap<String, String>) -> HeaderMap {
    headers
        .into_iter()
        .filter_map(|(name, value)| {
            let name = HeaderName::from_bytes(name.as_bytes()).ok()?;
            let value = HeaderValue::from_str(&value).ok()?;
            Some((name, value))
        })
        .collect()
}

fn from_header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect()
}

/// [`HttpTransport`] backed by `reqwest` with rustls.
///
/// One connection pool is shared by every request the process makes.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with an overall request timeout and a connect timeout.
    ///
    /// # Errors
    ///
    /// [`TransportError::Connection`] if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration, connect_timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| TransportError::Connection(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<Response, TransportError> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };

        let mut outgoing = self
            .client
            .request(method, &request.url)
            .headers(to_header_map(request.headers));
        if let Some(body) = request.body {
            outgoing = outgoing.body(body);
        }

        outgoing.send().await.map_err(|e| classify(Phase::Connect, &e))
    }

    async fn buffer(response: Response) -> Result<HttpResponse, TransportError> {
        let status = response.status().as_u16();
        let headers = from_header_map(response.headers());
        let body = response.bytes().await.map_err(|e| classify(Phase::Body, &e))?;

        Ok(HttpResponse { status, headers, body })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self.dispatch(request).await?;
        Self::buffer(response).await
    }

    async fn send_streaming(&self, request: HttpRequest) -> Result<ChunkedStream, TransportError> {
        let response = self.dispatch(request).await?;

        if !response.status().is_success() {
            let HttpResponse { status, headers, body } = Self::buffer(response).await?;
            return Err(TransportError::Status { status, headers, body });
        }

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| classify(Phase::Body, &e)));

        Ok(Box::pin(chunks))
    }
}
