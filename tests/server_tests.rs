//! HTTP routes exercised through an in-process test server.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use std::sync::Arc;

use study_buddy::error::{NetworkError, StudyBuddyError};
use study_buddy::mocks::ScriptedGenerationClient;
use study_buddy::server::{DOCUMENT_FIELD, MISSING_INPUT_MESSAGE, VIDEO_URL_FIELD};
use study_buddy::{router, AppState, ClientHandle, ConfigurationError, StudyGuideService};

fn server_with(client: ClientHandle) -> TestServer {
    let service = Arc::new(StudyGuideService::new(client));
    TestServer::new(router(AppState::new(service))).unwrap()
}

fn server_for(client: &Arc<ScriptedGenerationClient>) -> TestServer {
    server_with(Ok(client.clone()))
}

fn submission(video_url: &str, document: &'static [u8]) -> MultipartForm {
    MultipartForm::new()
        .add_text(VIDEO_URL_FIELD, video_url.to_string())
        .add_part(
            DOCUMENT_FIELD,
            Part::bytes(document).file_name("chapter.pdf").mime_type("application/pdf"),
        )
}

#[tokio::test]
async fn index_serves_the_form() {
    let client = Arc::new(ScriptedGenerationClient::with_fragments(["unused"]));
    let server = server_for(&client);

    let response = server.get("/").await;

    response.assert_status_ok();
    let page = response.text();
    assert!(page.contains("Generate Guide"));
    assert!(page.contains("name=\"video_url\""));
    assert!(page.contains("name=\"document\""));
    assert_eq!(client.total_calls(), 0);
}

#[tokio::test]
async fn guide_is_rendered_as_html() {
    let client = Arc::new(ScriptedGenerationClient::with_fragments(["# Guide\n", "- point one"]));
    let server = server_for(&client);

    let response = server
        .post("/guide")
        .multipart(submission("https://youtu.be/lecture", b"%PDF-1.7"))
        .await;

    response.assert_status_ok();
    let page = response.text();
    assert!(page.contains("<h1>Guide</h1>"));
    assert!(page.contains("<li>point one</li>"));
    assert_eq!(client.complete_calls(), 1);

    let request = client.last_request().unwrap();
    assert_eq!(request.video_reference(), "https://youtu.be/lecture");
    assert_eq!(request.document_name(), "chapter.pdf");
    assert_eq!(&request.document()[..], b"%PDF-1.7");
}

#[tokio::test]
async fn generation_failure_still_renders_a_page() {
    let client = Arc::new(ScriptedGenerationClient::failing_on_open(StudyBuddyError::Network(
        NetworkError::ConnectionFailed {
            message: "connection refused".to_string(),
        },
    )));
    let server = server_for(&client);

    let response = server
        .post("/guide")
        .multipart(submission("https://youtu.be/lecture", b"%PDF-1.7"))
        .await;

    response.assert_status_ok();
    let page = response.text();
    assert!(page.contains("An Error Occurred"));
    assert!(page.contains("connection refused"));
}

#[tokio::test]
async fn missing_video_url_is_rejected_before_generation() {
    let client = Arc::new(ScriptedGenerationClient::with_fragments(["unused"]));
    let server = server_for(&client);

    let response = server.post("/guide").multipart(submission("   ", b"%PDF-1.7")).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains(MISSING_INPUT_MESSAGE));
    assert_eq!(client.total_calls(), 0);
}

#[tokio::test]
async fn missing_document_is_rejected_before_generation() {
    let client = Arc::new(ScriptedGenerationClient::with_fragments(["unused"]));
    let server = server_for(&client);

    let form = MultipartForm::new().add_text(VIDEO_URL_FIELD, "https://youtu.be/lecture");
    let response = server.post("/guide/stream").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains(MISSING_INPUT_MESSAGE));
    assert_eq!(client.total_calls(), 0);
}

#[tokio::test]
async fn stream_emits_status_updates_and_done() {
    let client = Arc::new(ScriptedGenerationClient::with_fragments(["# Guide\n", "- point one"]));
    let server = server_for(&client);

    let response = server
        .post("/guide/stream")
        .multipart(submission("https://youtu.be/lecture", b"%PDF-1.7"))
        .await;

    response.assert_status_ok();
    let body = response.text();
    let status = body.find("event: status").unwrap();
    let update = body.find("event: update").unwrap();
    let done = body.find("event: done").unwrap();
    assert!(status < update && update < done);
    assert_eq!(body.matches("event: update").count(), 2);
    assert!(body.contains("<li>point one</li>"));
    assert!(!body.contains("event: error"));
    assert_eq!(client.stream_calls(), 1);
}

#[tokio::test]
async fn stream_failure_ends_with_error_event() {
    let client = Arc::new(ScriptedGenerationClient::failing_after(
        ["partial"],
        StudyBuddyError::Network(NetworkError::ConnectionFailed {
            message: "connection refused".to_string(),
        }),
    ));
    let server = server_for(&client);

    let response = server
        .post("/guide/stream")
        .multipart(submission("https://youtu.be/lecture", b"%PDF-1.7"))
        .await;

    response.assert_status_ok();
    let body = response.text();
    assert_eq!(body.matches("event: update").count(), 1);
    assert_eq!(body.matches("event: error").count(), 1);
    assert!(body.contains("An Error Occurred"));
    assert!(!body.contains("event: done"));
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let client = Arc::new(ScriptedGenerationClient::with_fragments(["unused"]));
    let service = Arc::new(StudyGuideService::new(Ok(client.clone())));
    let server = TestServer::new(router(AppState::new(service).with_max_upload_bytes(64))).unwrap();

    let response = server
        .post("/guide")
        .multipart(submission("https://youtu.be/lecture", &[b'x'; 4096]))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(client.total_calls(), 0);
}

#[tokio::test]
async fn healthz_reports_client_status() {
    let client = Arc::new(ScriptedGenerationClient::with_fragments(["unused"]));
    let healthy = server_for(&client);

    let response = healthy.get("/healthz").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "ok");

    let unconfigured = server_with(Err(ConfigurationError::MissingProjectId));

    let response = unconfigured.get("/healthz").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.text().contains("GOOGLE_PROJECT_ID"));
}
