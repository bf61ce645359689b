//! Caption cues burned onto finished clips.

use serde::{Deserialize, Serialize};

/// One timed chunk of caption text, clip-relative seconds.
///
/// Cues produced by the segmenter are strictly ordered and non-overlapping;
/// their bounds are exactly the first/last word bounds of the grouped words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionCue {
    /// Display start, seconds from clip start
    pub start: f64,
    /// Display end, seconds from clip start
    pub end: f64,
    /// Caption text
    pub text: String,
}

impl CaptionCue {
    /// Create a new caption cue.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}
