//! Route handlers.

use askama::Template;
use async_stream::stream;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::Html;
use futures::{Stream, StreamExt};
use std::convert::Infallible;

use super::error::ServerError;
use super::markdown::render_markdown;
use super::templates::{GuideTemplate, IndexTemplate, TITLE};
use super::upload::read_submission;
use super::AppState;
use crate::guide::{GuideOutcome, RelayUpdate, PROCESSING_MESSAGE};

/// `GET /`
pub(crate) async fn index(State(state): State<AppState>) -> Result<Html<String>, ServerError> {
    let page = IndexTemplate {
        title: TITLE,
        max_upload_mib: state.max_upload_bytes / (1024 * 1024),
    };
    Ok(Html(page.render()?))
}

/// `POST /guide`
pub(crate) async fn generate_guide(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, ServerError> {
    let request = read_submission(multipart).await?;
    let outcome = state.service.generate_guide(&request).await;

    let page = GuideTemplate {
        title: TITLE,
        guide_html: render_markdown(outcome.markdown()),
        failed: matches!(outcome, GuideOutcome::Failed(_)),
    };
    Ok(Html(page.render()?))
}

/// `POST /guide/stream`
///
/// Events: one `status`, then `update` per buffer, then `done` or `error`.
/// A client that disconnects drops the stream, which abandons generation.
pub(crate) async fn stream_guide(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ServerError> {
    let request = read_submission(multipart).await?;
    let mut updates = state.service.stream_guide(request);

    let events = stream! {
        yield Ok::<_, Infallible>(Event::default().event("status").data(PROCESSING_MESSAGE));

        let mut failed = false;
        while let Some(update) = updates.next().await {
            match update {
                RelayUpdate::Progress(buffer) => {
                    yield Ok(html_event("update", &buffer));
                }
                RelayUpdate::Failed(report) => {
                    failed = true;
                    yield Ok(html_event("error", report.markdown()));
                }
            }
        }

        if !failed {
            yield Ok(Event::default().event("done").data(""));
        }
    };

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// An event whose data is `markdown` rendered as HTML.
fn html_event(name: &str, markdown: &str) -> Event {
    // SSE field values cannot carry carriage returns.
    Event::default()
        .event(name)
        .data(render_markdown(markdown).replace('\r', ""))
}

/// `GET /healthz`
pub(crate) async fn healthz(State(state): State<AppState>) -> (StatusCode, String) {
    match state.service.client_status() {
        Ok(()) => (StatusCode::OK, "ok".to_string()),
        Err(error) => (StatusCode::SERVICE_UNAVAILABLE, error.to_string()),
    }
}
