//! Study-guide generation: inputs, prompt, relay and the service facade.
//!
//! The relay is the only stateful piece. Per request it owns one text buffer
//! that grows by each fragment the model emits and is handed to the caller
//! after every append. Every failure is converted into an [`ErrorReport`] at
//! this boundary, so callers always end with something displayable.

mod document;
mod prompt;
mod relay;
mod report;
mod request;
mod service;

pub use document::{document_name_from_path, read_document};
pub use prompt::{
    build_generate_request, safety_settings, DOCUMENT_INTRO, INSTRUCTIONS, VIDEO_INTRO,
    VIDEO_MIME_TYPE,
};
pub use relay::{generate_once, relay, GuideOutcome, RelayStream, RelayUpdate};
pub use report::ErrorReport;
pub use request::{GenerationRequest, DEFAULT_DOCUMENT_NAME};
pub use service::{StudyGuideService, PROCESSING_MESSAGE};
