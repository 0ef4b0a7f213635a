//! The generation client boundary.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::error::StudyBuddyResult;
use crate::guide::GenerationRequest;

/// Lazy, finite sequence of text fragments in arrival order.
///
/// Nothing is fetched ahead of demand. Dropping the stream abandons the
/// underlying call.
pub type FragmentStream = Pin<Box<dyn Stream<Item = StudyBuddyResult<String>> + Send>>;

/// A multimodal model that turns a [`GenerationRequest`] into Markdown.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generates the whole response in one call.
    async fn complete(&self, request: &GenerationRequest) -> StudyBuddyResult<String>;

    /// Opens a fragment stream for the response.
    ///
    /// Errors returned here happen before any fragment exists; errors inside
    /// the stream end it.
    async fn stream(&self, request: &GenerationRequest) -> StudyBuddyResult<FragmentStream>;
}
