//! Gemini on Vertex AI.

use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

use super::safety::check_safety_blocks;
use super::traits::{FragmentStream, GenerationClient};
use super::validation::validate_generate_request;
use crate::auth;
use crate::config::StudyBuddyConfig;
use crate::error::{StudyBuddyError, StudyBuddyResult};
use crate::guide::{build_generate_request, GenerationRequest};
use crate::observability::Logger;
use crate::resilience::RetryExecutor;
use crate::streaming::ResponseChunkParser;
use crate::transport::{endpoints, HttpMethod, HttpTransport, RequestBuilder, ResponseParser};
use crate::types::{GenerateContentRequest, GenerateContentResponse};

/// [`GenerationClient`] backed by a Google publisher model on Vertex AI.
///
/// Built with [`VertexClientBuilder`](super::VertexClientBuilder).
pub struct VertexGenerationClient {
    project_id: String,
    location: String,
    model: String,
    transport: Arc<dyn HttpTransport>,
    request_builder: RequestBuilder,
    retry: RetryExecutor,
    logger: Arc<dyn Logger>,
}

impl VertexGenerationClient {
    pub(crate) fn new(
        config: &StudyBuddyConfig,
        transport: Arc<dyn HttpTransport>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let request_builder = RequestBuilder::new(
            config.base_url.clone(),
            config.api_version.clone(),
            auth::from_credentials(&config.credentials),
        );

        Self {
            project_id: config.project_id.clone(),
            location: config.location.clone(),
            model: config.model.clone(),
            transport,
            request_builder,
            retry: RetryExecutor::new(config.retry_config.clone()),
            logger,
        }
    }

    fn prepare(&self, request: &GenerationRequest) -> StudyBuddyResult<GenerateContentRequest> {
        let body = build_generate_request(request);
        validate_generate_request(&body)?;
        Ok(body)
    }
}

#[async_trait]
impl GenerationClient for VertexGenerationClient {
    async fn complete(&self, request: &GenerationRequest) -> StudyBuddyResult<String> {
        let start = Instant::now();
        let body = self.prepare(request)?;
        let path = endpoints::generate_content(&self.project_id, &self.location, &self.model);

        self.logger.debug("Starting content generation", json!({
            "model": self.model,
            "document_name": request.document_name(),
            "document_bytes": request.document().len(),
        }));

        let transport = &self.transport;
        let builder = &self.request_builder;
        let body = &body;
        let path = path.as_str();

        let result = self
            .retry
            .execute(|| async move {
                let http_request = builder.build_request(HttpMethod::Post, path, Some(body), None)?;
                let http_response = transport
                    .send(http_request)
                    .await
                    .map_err(StudyBuddyError::from)?;
                ResponseParser::parse_response::<GenerateContentResponse>(http_response)
            })
            .await;

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                self.logger.error("Content generation failed", json!({
                    "model": self.model,
                    "error": error.to_string(),
                    "duration_ms": start.elapsed().as_millis() as u64,
                }));
                return Err(error);
            }
        };

        check_safety_blocks(&response)?;

        let usage = response.usage_metadata.clone().unwrap_or_default();
        self.logger.info("Content generation completed", json!({
            "model": self.model,
            "duration_ms": start.elapsed().as_millis() as u64,
            "prompt_tokens": usage.prompt_token_count,
            "candidates_tokens": usage.candidates_token_count,
            "total_tokens": usage.total_token_count,
        }));

        Ok(response.text())
    }

    async fn stream(&self, request: &GenerationRequest) -> StudyBuddyResult<FragmentStream> {
        let start = Instant::now();
        let body = self.prepare(request)?;
        let path = endpoints::stream_generate_content(&self.project_id, &self.location, &self.model);

        self.logger.debug("Starting streaming content generation", json!({
            "model": self.model,
            "document_name": request.document_name(),
            "document_bytes": request.document().len(),
        }));

        let transport = &self.transport;
        let builder = &self.request_builder;
        let body = &body;
        let path = path.as_str();

        // Only opening the stream is retried; once bytes flow, failures end it.
        let opened = self
            .retry
            .execute(|| async move {
                let http_request = builder.build_request(HttpMethod::Post, path, Some(body), None)?;
                transport
                    .send_streaming(http_request)
                    .await
                    .map_err(StudyBuddyError::from)
            })
            .await;

        let chunks = match opened {
            Ok(chunks) => chunks,
            Err(error) => {
                self.logger.error("Failed to open generation stream", json!({
                    "model": self.model,
                    "error": error.to_string(),
                }));
                return Err(error);
            }
        };

        let logger = Arc::clone(&self.logger);
        let model = self.model.clone();
        let mut parser = ResponseChunkParser::new(chunks);

        let fragments = stream! {
            let mut fragment_count = 0usize;
            let mut usage = None;

            while let Some(chunk) = parser.next().await {
                let checked = chunk.and_then(|response| {
                    check_safety_blocks(&response)?;
                    Ok(response)
                });

                match checked {
                    Ok(response) => {
                        fragment_count += 1;
                        if response.usage_metadata.is_some() {
                            usage = response.usage_metadata.clone();
                        }
                        yield Ok(response.text());
                    }
                    Err(error) => {
                        logger.error("Generation stream failed", json!({
                            "model": model,
                            "error": error.to_string(),
                            "fragments": fragment_count,
                        }));
                        yield Err(error);
                        return;
                    }
                }
            }

            let usage = usage.unwrap_or_default();
            logger.info("Streaming generation completed", json!({
                "model": model,
                "fragments": fragment_count,
                "duration_ms": start.elapsed().as_millis() as u64,
                "total_tokens": usage.total_token_count,
            }));
        };

        Ok(Box::pin(fragments))
    }
}
