//! Clip segment and audio extraction.
//!
//! The first pipeline stages cut the clip window out of the source video
//! and pull a 16 kHz mono WAV from it for the speaker detector.

use std::path::Path;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Extract a clip segment from the source video.
///
/// Re-encodes for frame-accurate cut points; stream copy would snap to
/// keyframes and shift the window by up to a GOP.
pub async fn extract_segment(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    start_secs: f64,
    duration_secs: f64,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    info!(
        "Extracting segment: {} -> {} (start: {:.2}s, duration: {:.2}s)",
        input.display(),
        output.display(),
        start_secs,
        duration_secs
    );

    let cmd = FfmpegCommand::new(input, output)
        .seek(start_secs)
        .duration(duration_secs)
        .video_codec("libx264")
        .preset("veryfast")
        .crf(18)
        .audio_codec("aac")
        .audio_bitrate("128k");

    FfmpegRunner::new().run(&cmd).await
}

/// Extract the segment's audio as 16 kHz mono PCM WAV.
pub async fn extract_audio(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    info!(
        "Extracting audio: {} -> {}",
        input.display(),
        output.display()
    );

    let cmd = FfmpegCommand::new(input, output)
        .output_arg("-vn")
        .audio_codec("pcm_s16le")
        .output_args(["-ar", "16000", "-ac", "1"]);

    FfmpegRunner::new().run(&cmd).await
}
