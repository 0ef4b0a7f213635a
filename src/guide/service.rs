//! Entry point used by the presentation layer.

use async_stream::stream;
use futures::StreamExt;
use tracing::Instrument;
use uuid::Uuid;

use super::relay::{generate_once, relay, GuideOutcome, RelayStream, RelayUpdate};
use super::report::ErrorReport;
use super::request::GenerationRequest;
use crate::client::ClientHandle;
use crate::error::{ConfigurationError, ResponseError, StudyBuddyError};

/// First status line shown while a guide is being prepared.
pub const PROCESSING_MESSAGE: &str = "Processing inputs and preparing to generate... Please wait.";

/// Generates study guides through an injected client handle.
///
/// The handle is checked on every call, so a service built from a broken
/// configuration still answers each request with an [`ErrorReport`].
pub struct StudyGuideService {
    client: ClientHandle,
}

impl StudyGuideService {
    /// Creates a service around a client handle.
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }

    /// Whether the client handle is usable.
    pub fn client_status(&self) -> Result<(), &ConfigurationError> {
        self.client.as_ref().map(|_| ())
    }

    /// Generates the whole guide with one call.
    pub async fn generate_guide(&self, request: &GenerationRequest) -> GuideOutcome {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("generate_guide", %request_id);

        async {
            tracing::info!(
                video_reference = %request.video_reference(),
                document_bytes = request.document().len(),
                "Study guide requested"
            );

            let client = match &self.client {
                Ok(client) => client,
                Err(error) => {
                    tracing::error!(error = %error, "Generation client unavailable");
                    return GuideOutcome::Failed(ErrorReport::from_error(
                        &StudyBuddyError::Configuration(error.clone()),
                    ));
                }
            };

            let outcome = generate_once(client.as_ref(), request).await;
            if let GuideOutcome::Complete(text) = &outcome {
                tracing::info!(guide_bytes = text.len(), "Study guide generated");
            }
            outcome
        }
        .instrument(span)
        .await
    }

    /// Streams the guide as a sequence of growing buffers.
    ///
    /// Always ends with either the final buffer or a single
    /// [`RelayUpdate::Failed`]. A stream that finishes without any text is
    /// reported as an empty response.
    pub fn stream_guide(&self, request: GenerationRequest) -> RelayStream {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("stream_guide", %request_id);
        let handle = self.client.clone();

        Box::pin(stream! {
            span.in_scope(|| {
                tracing::info!(
                    video_reference = %request.video_reference(),
                    document_bytes = request.document().len(),
                    "Streaming study guide requested"
                )
            });

            let client = match handle {
                Ok(client) => client,
                Err(error) => {
                    span.in_scope(|| tracing::error!(error = %error, "Generation client unavailable"));
                    yield RelayUpdate::Failed(ErrorReport::from_error(&StudyBuddyError::Configuration(error)));
                    return;
                }
            };

            let fragments = match client.stream(&request).instrument(span.clone()).await {
                Ok(fragments) => fragments,
                Err(error) => {
                    span.in_scope(|| tracing::warn!(error = %error, "Failed to open generation stream"));
                    yield RelayUpdate::Failed(ErrorReport::from_error(&error));
                    return;
                }
            };

            let mut updates = relay(fragments);
            let mut produced_text = false;

            while let Some(update) = updates.next().instrument(span.clone()).await {
                let failed = update.is_failure();
                if let RelayUpdate::Progress(buffer) = &update {
                    produced_text = !buffer.is_empty();
                }
                yield update;
                if failed {
                    return;
                }
            }

            if produced_text {
                span.in_scope(|| tracing::info!("Streaming study guide completed"));
            } else {
                let error = StudyBuddyError::Response(ResponseError::EmptyResponse);
                span.in_scope(|| tracing::warn!(error = %error, "Generation stream produced no text"));
                yield RelayUpdate::Failed(ErrorReport::from_error(&error));
            }
        })
    }
}
