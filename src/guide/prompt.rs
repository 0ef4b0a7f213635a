//! The fixed study-guide prompt.

use crate::types::{Content, GenerateContentRequest, HarmCategory, Part, SafetySetting};
use super::request::GenerationRequest;

/// Instruction lines sent ahead of the inputs, one text part each.
pub const INSTRUCTIONS: [&str; 4] = [
    "You are an expert academic assistant.",
    "Please analyze the content of the provided YouTube video lecture and the attached PDF document.",
    "Create a comprehensive, well-structured study guide in Markdown format that synthesizes the key concepts, definitions, and examples from both sources.",
    "Your guide should have a clear structure with headings and bullet points.",
];

/// Text part introducing the document.
pub const DOCUMENT_INTRO: &str = "Here is the PDF document:";

/// Text part introducing the video.
pub const VIDEO_INTRO: &str = "And here is the video:";

/// MIME type declared for the video reference.
pub const VIDEO_MIME_TYPE: &str = "video/mp4";

/// Every harm category at the most permissive threshold.
pub fn safety_settings() -> Vec<SafetySetting> {
    [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ]
    .into_iter()
    .map(SafetySetting::block_none)
    .collect()
}

/// Composes the wire request for one submission.
///
/// One user turn: the instructions, the document intro, the PDF as inline
/// data, the video intro, then the video as a file reference.
pub fn build_generate_request(request: &GenerationRequest) -> GenerateContentRequest {
    let mut parts: Vec<Part> = INSTRUCTIONS.iter().map(|line| Part::text(*line)).collect();

    parts.push(Part::text(DOCUMENT_INTRO));
    parts.push(Part::inline_data(mime::APPLICATION_PDF.essence_str(), request.document()));
    parts.push(Part::text(VIDEO_INTRO));
    parts.push(Part::file_data(VIDEO_MIME_TYPE, request.video_reference()));

    GenerateContentRequest {
        contents: vec![Content::user(parts)],
        system_instruction: None,
        safety_settings: Some(safety_settings()),
    }
}
