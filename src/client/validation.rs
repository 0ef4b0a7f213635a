//! Checks on an outgoing generation request.

use crate::error::{RequestError, StudyBuddyError, StudyBuddyResult, ValidationDetail};
use crate::types::{GenerateContentRequest, Part};

/// Validate a generate content request before it leaves the process.
pub fn validate_generate_request(request: &GenerateContentRequest) -> StudyBuddyResult<()> {
    let mut details = Vec::new();

    if request.contents.is_empty() {
        details.push(ValidationDetail {
            field: "contents".to_string(),
            description: "Contents array cannot be empty".to_string(),
        });
    }

    for (idx, content) in request.contents.iter().enumerate() {
        if content.parts.is_empty() {
            details.push(ValidationDetail {
                field: format!("contents[{}].parts", idx),
                description: "Content must have at least one part".to_string(),
            });
        }

        for (part_idx, part) in content.parts.iter().enumerate() {
            validate_part(part, &format!("contents[{}].parts[{}]", idx, part_idx), &mut details);
        }
    }

    if !details.is_empty() {
        return Err(StudyBuddyError::Request(RequestError::ValidationError {
            message: "Invalid generate content request".to_string(),
            details,
        }));
    }

    Ok(())
}

fn validate_part(part: &Part, field_prefix: &str, details: &mut Vec<ValidationDetail>) {
    match part {
        Part::Text { text } => {
            if text.is_empty() {
                details.push(ValidationDetail {
                    field: format!("{}.text", field_prefix),
                    description: "Text cannot be empty".to_string(),
                });
            }
        }
        Part::InlineData { inline_data } => {
            if inline_data.mime_type.is_empty() {
                details.push(ValidationDetail {
                    field: format!("{}.inline_data.mime_type", field_prefix),
                    description: "MIME type is required".to_string(),
                });
            }
            if inline_data.data.is_empty() {
                details.push(ValidationDetail {
                    field: format!("{}.inline_data.data", field_prefix),
                    description: "Data cannot be empty".to_string(),
                });
            }
        }
        Part::FileData { file_data } => {
            if file_data.file_uri.trim().is_empty() {
                details.push(ValidationDetail {
                    field: format!("{}.file_data.file_uri", field_prefix),
                    description: "File URI is required".to_string(),
                });
            }
        }
        Part::Other(_) => {}
    }
}
