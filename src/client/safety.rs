//! Detection of blocked prompts and candidates.

use crate::error::{ContentError, SafetyRatingInfo, StudyBuddyError, StudyBuddyResult};
use crate::types::{BlockReason, FinishReason, GenerateContentResponse, SafetyRating};

/// Fails when the prompt or any candidate was blocked.
///
/// Applies to complete responses and to each streamed chunk alike.
pub fn check_safety_blocks(response: &GenerateContentResponse) -> StudyBuddyResult<()> {
    if let Some(prompt_feedback) = &response.prompt_feedback {
        if let Some(block_reason) = &prompt_feedback.block_reason {
            return match block_reason {
                BlockReason::Safety => {
                    let ratings = prompt_feedback.safety_ratings.as_deref().unwrap_or_default();
                    tracing::warn!(
                        block_reason = ?block_reason,
                        message = prompt_feedback.block_reason_message.as_deref().unwrap_or(""),
                        "Prompt blocked for safety"
                    );
                    Err(safety_blocked(ratings))
                }
                BlockReason::Blocklist | BlockReason::ProhibitedContent => {
                    tracing::warn!(block_reason = ?block_reason, "Prompt blocked as prohibited content");
                    Err(StudyBuddyError::Content(ContentError::ProhibitedContent))
                }
                BlockReason::Other => {
                    tracing::debug!(block_reason = ?block_reason, "Prompt blocked for non-safety reason");
                    Ok(())
                }
            };
        }
    }

    for (index, candidate) in response.candidates.iter().flatten().enumerate() {
        match candidate.finish_reason {
            Some(FinishReason::Safety) => {
                let ratings = candidate.safety_ratings.as_deref().unwrap_or_default();
                tracing::warn!(candidate_index = index, "Candidate blocked for safety");
                return Err(safety_blocked(ratings));
            }
            Some(FinishReason::Recitation) => {
                tracing::warn!(candidate_index = index, "Candidate blocked for recitation");
                return Err(StudyBuddyError::Content(ContentError::RecitationBlocked));
            }
            Some(FinishReason::ProhibitedContent) | Some(FinishReason::Blocklist) => {
                tracing::warn!(candidate_index = index, "Candidate blocked as prohibited content");
                return Err(StudyBuddyError::Content(ContentError::ProhibitedContent));
            }
            _ => {}
        }
    }

    Ok(())
}

fn safety_blocked(ratings: &[SafetyRating]) -> StudyBuddyError {
    let reason = ratings
        .iter()
        .find(|r| r.blocked)
        .or_else(|| ratings.first())
        .map(|r| format!("{} ({})", r.category.as_str(), r.probability.as_str()))
        .unwrap_or_else(|| "unspecified".to_string());

    let safety_ratings = ratings
        .iter()
        .map(|r| SafetyRatingInfo {
            category: r.category.as_str().to_string(),
            probability: r.probability.as_str().to_string(),
        })
        .collect();

    StudyBuddyError::Content(ContentError::SafetyBlocked { reason, safety_ratings })
}
