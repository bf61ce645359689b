//! Caption segmentation and burn-in.

pub mod render;
pub mod segmenter;

pub use render::{burn_captions, write_srt};
pub use segmenter::segment_captions;
