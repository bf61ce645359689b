//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during media processing.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("Speaker detector not found: {0}")]
    DetectorNotFound(String),

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("Speaker detection artifacts invalid: {0}")]
    DetectionData(String),

    #[error("Failed to decode clip segment: {0}")]
    Decode(String),

    #[error(
        "Audio/video duration drift beyond tolerance: video {video_secs:.3}s, \
         audio {audio_secs:.3}s, tolerance {tolerance_secs:.3}s"
    )]
    MuxTimingDrift {
        video_secs: f64,
        audio_secs: f64,
        tolerance_secs: f64,
    },

    #[error("Subtitle rendering failed: {0}")]
    SubtitleRender(String),

    #[error("Invalid video file: {0}")]
    InvalidVideo(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create a detection artifact error.
    pub fn detection_data(message: impl Into<String>) -> Self {
        Self::DetectionData(message.into())
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create a subtitle rendering error.
    pub fn subtitle_render(message: impl Into<String>) -> Self {
        Self::SubtitleRender(message.into())
    }

    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }
}
