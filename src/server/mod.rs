//! HTTP front-end.
//!
//! | Route | Purpose |
//! |---|---|
//! | `GET /` | submission form |
//! | `POST /guide` | generate a guide and return it as a page |
//! | `POST /guide/stream` | generate a guide as Server-Sent Events |
//! | `GET /healthz` | whether the generation client is configured |

mod error;
mod handlers;
mod markdown;
mod templates;
mod upload;

pub use error::{ServerError, MISSING_INPUT_MESSAGE};
pub use markdown::render_markdown;
pub use upload::{DOCUMENT_FIELD, VIDEO_URL_FIELD};

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::guide::StudyGuideService;

/// Default limit for a whole submission, in bytes.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The study-guide service.
    pub service: Arc<StudyGuideService>,
    /// Largest accepted request body.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Creates state with the default upload limit.
    pub fn new(service: Arc<StudyGuideService>) -> Self {
        Self {
            service,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Sets the upload limit.
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/guide", post(handlers::generate_guide))
        .route("/guide/stream", post(handlers::stream_guide))
        .route("/healthz", get(handlers::healthz))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
