//! Wire types for the Vertex AI `generateContent` family of endpoints.
//!
//! Only the shapes the study-guide prompt needs are modelled; unknown fields
//! and enum values in responses are tolerated.

pub mod content;
pub mod generation;
pub mod safety;

pub use content::{Blob, Content, FileData, Part, Role};

pub use generation::{
    BlockReason, Candidate, FinishReason, GenerateContentRequest, GenerateContentResponse,
    PromptFeedback, UsageMetadata,
};

pub use safety::{HarmBlockThreshold, HarmCategory, HarmProbability, SafetyRating, SafetySetting};
