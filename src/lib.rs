//! # Study Buddy
//!
//! Turns a YouTube lecture and a PDF chapter into one Markdown study guide
//! using Gemini on Vertex AI, and serves it through a small web front-end.
//!
//! ## Features
//!
//! - One-shot and streaming generation behind a single [`GenerationClient`] trait
//! - Streaming relay that hands out the growing guide after every fragment
//! - Uniform Markdown [`ErrorReport`] for every failure, so the page never ends blank
//! - Retry with exponential backoff for transient failures before the first fragment
//! - Structured logging with secret redaction
//! - axum front-end with Server-Sent Events
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use study_buddy::{connect_from_env, GenerationRequest, RelayUpdate, StudyGuideService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = StudyGuideService::new(connect_from_env());
//!
//!     let pdf = std::fs::read("chapter.pdf")?;
//!     let request = GenerationRequest::new("https://www.youtube.com/watch?v=abc", pdf, "chapter.pdf")?;
//!
//!     let mut updates = service.stream_guide(request);
//!     while let Some(update) = updates.next().await {
//!         if let RelayUpdate::Failed(report) = &update {
//!             eprintln!("{report}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `config` - Configuration types, builder and environment loading
//! - `auth` - Bearer-token and API-key authentication
//! - `error` - Error taxonomy and HTTP status mapping
//! - `transport` - HTTP transport, request building, response parsing, endpoints
//! - `types` - Vertex AI wire types
//! - `streaming` - Incremental parser for streamed responses
//! - `resilience` - Retry executor
//! - `observability` - Structured logging and subscriber setup
//! - `client` - Generation client trait and the Vertex AI adapter
//! - `guide` - Requests, prompt, relay, error reports and the service facade
//! - `server` - HTTP routes, templates and Markdown rendering

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod guide;
pub mod observability;
pub mod resilience;
pub mod server;
pub mod streaming;
pub mod transport;
pub mod types;

// Test doubles, available to integration tests
pub mod mocks;

pub use client::{
    connect, connect_from_env, ClientHandle, FragmentStream, GenerationClient, VertexClientBuilder,
    VertexGenerationClient,
};
pub use config::{
    Credentials, RetryConfig, StudyBuddyConfig, StudyBuddyConfigBuilder, DEFAULT_API_VERSION,
    DEFAULT_LOCATION, DEFAULT_MODEL,
};
pub use error::{ConfigurationError, MissingInputError, StudyBuddyError, StudyBuddyResult};
pub use guide::{
    generate_once, relay, ErrorReport, GenerationRequest, GuideOutcome, RelayStream, RelayUpdate,
    StudyGuideService,
};
pub use observability::{LogFormat, LoggingConfig};
pub use server::{router, AppState};
