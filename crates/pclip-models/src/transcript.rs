//! Transcript words from the transcription collaborator.

use serde::{Deserialize, Serialize};

/// A single transcribed word with absolute timing in the source video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptWord {
    /// Word text
    pub text: String,
    /// Start time in seconds, absolute in the source video
    pub start: f64,
    /// End time in seconds, absolute in the source video
    pub end: f64,
}

impl TranscriptWord {
    /// Create a new transcript word.
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}
