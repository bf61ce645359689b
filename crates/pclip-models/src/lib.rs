//! Shared data models for the PodClip pipeline.
//!
//! This crate holds the dependency-light types exchanged between the media
//! pipeline and the orchestrator: face tracks and speaker scores produced by
//! the external detector, transcript words, clip windows, planned crop
//! frames, and caption cues.

pub mod bbox;
pub mod caption;
pub mod crop;
pub mod timestamp;
pub mod track;
pub mod transcript;
pub mod window;

pub use bbox::FaceBox;
pub use caption::CaptionCue;
pub use crop::{CropFrame, CropRect, CropState};
pub use timestamp::{format_seconds, format_srt_timestamp};
pub use track::{ScoreSeries, Track};
pub use transcript::TranscriptWord;
pub use window::ClipWindow;
