//! HTTP-facing errors.

use askama::Template;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use super::templates::{ErrorTemplate, TITLE};
use crate::error::MissingInputError;

/// Message shown when a submission lacks the video URL or the document.
pub const MISSING_INPUT_MESSAGE: &str = "Error: Please provide both a YouTube URL and a PDF file.";

/// Failures that stop a request before generation starts.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The form was incomplete.
    #[error("Error: Please provide both a YouTube URL and a PDF file.")]
    MissingInput(#[from] MissingInputError),

    /// The multipart body could not be read (including when it is too large).
    #[error("Failed to read upload: {}", .0.body_text())]
    Upload(#[from] MultipartError),

    /// A page failed to render.
    #[error("Failed to render page: {0}")]
    Template(#[from] askama::Error),
}

impl ServerError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::MissingInput(_) => StatusCode::BAD_REQUEST,
            ServerError::Upload(e) => e.status(),
            ServerError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ServerError::MissingInput(reason) => {
                tracing::info!(reason = %reason, "Rejected incomplete submission");
            }
            ServerError::Upload(_) => tracing::warn!(status = %status, error = %self, "Rejected upload"),
            ServerError::Template(_) => tracing::error!(error = %self, "Page rendering failed"),
        }

        let page = ErrorTemplate {
            title: TITLE,
            message: self.to_string(),
        };

        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(_) => (status, self.to_string()).into_response(),
        }
    }
}
