//! Incremental aggregation of generated fragments.

use async_stream::stream;
use futures::{Stream, StreamExt};
use std::pin::Pin;

use super::report::ErrorReport;
use super::request::GenerationRequest;
use crate::client::{FragmentStream, GenerationClient};
use crate::error::{ResponseError, StudyBuddyError};

/// One element of a relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayUpdate {
    /// The whole buffer so far, after appending the latest fragment.
    Progress(String),
    /// Terminal failure; nothing follows.
    Failed(ErrorReport),
}

impl RelayUpdate {
    /// The Markdown to display for this update.
    pub fn markdown(&self) -> &str {
        match self {
            RelayUpdate::Progress(buffer) => buffer,
            RelayUpdate::Failed(report) => report.markdown(),
        }
    }

    /// Whether this update ends the relay with a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, RelayUpdate::Failed(_))
    }
}

/// Stream of relay updates for one request.
pub type RelayStream = Pin<Box<dyn Stream<Item = RelayUpdate> + Send>>;

/// Result of a non-streaming generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuideOutcome {
    /// The complete Markdown guide.
    Complete(String),
    /// The failure to display instead.
    Failed(ErrorReport),
}

impl GuideOutcome {
    /// The Markdown to display.
    pub fn markdown(&self) -> &str {
        match self {
            GuideOutcome::Complete(text) => text,
            GuideOutcome::Failed(report) => report.markdown(),
        }
    }
}

/// Turns a fragment stream into a stream of growing buffers.
///
/// For fragments `f1..fn` the relay yields `n` updates, the `i`-th holding
/// `f1 + .. + fi`. Empty fragments still produce an update. The first error
/// from the source becomes a terminal [`RelayUpdate::Failed`] and the source
/// is dropped.
pub fn relay(fragments: FragmentStream) -> RelayStream {
    Box::pin(stream! {
        let mut fragments = fragments;
        let mut buffer = String::new();

        while let Some(fragment) = fragments.next().await {
            match fragment {
                Ok(fragment) => {
                    buffer.push_str(&fragment);
                    yield RelayUpdate::Progress(buffer.clone());
                }
                Err(error) => {
                    tracing::warn!(error = %error, buffered_bytes = buffer.len(), "Relay ended by failure");
                    yield RelayUpdate::Failed(ErrorReport::from_error(&error));
                    return;
                }
            }
        }
    })
}

/// Calls the client once and wraps the outcome.
///
/// No caching: every call reaches the client. An empty completion counts as
/// a failure.
pub async fn generate_once(client: &dyn GenerationClient, request: &GenerationRequest) -> GuideOutcome {
    match client.complete(request).await {
        Ok(text) if text.is_empty() => {
            let error = StudyBuddyError::Response(ResponseError::EmptyResponse);
            tracing::warn!(error = %error, "Generation produced no text");
            GuideOutcome::Failed(ErrorReport::from_error(&error))
        }
        Ok(text) => GuideOutcome::Complete(text),
        Err(error) => {
            tracing::warn!(error = %error, "Generation failed");
            GuideOutcome::Failed(ErrorReport::from_error(&error))
        }
    }
}
