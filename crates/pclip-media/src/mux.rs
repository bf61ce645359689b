//! Audio muxing for reframed clips.
//!
//! Recombines the compositor's silent video with the original audio slice.
//! The two streams must already agree on duration: a discrepancy beyond the
//! configured tolerance signals an upstream extraction bug and is reported
//! instead of silently trimmed.

use std::path::Path;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::probe_duration;

/// Mux the audio track into the silent reframed video.
///
/// Video is stream-copied; audio is encoded to AAC for the final container.
/// The output lasts `min(video, audio)` via `-shortest`.
pub async fn mux_audio(
    video: impl AsRef<Path>,
    audio: impl AsRef<Path>,
    output: impl AsRef<Path>,
    tolerance_secs: f64,
) -> MediaResult<()> {
    let video = video.as_ref();
    let audio = audio.as_ref();
    let output = output.as_ref();

    let video_secs = probe_duration(video).await?;
    let audio_secs = probe_duration(audio).await?;

    if (video_secs - audio_secs).abs() > tolerance_secs {
        return Err(MediaError::MuxTimingDrift {
            video_secs,
            audio_secs,
            tolerance_secs,
        });
    }

    info!(
        "Muxing audio: {} + {} -> {} (video {:.3}s, audio {:.3}s)",
        video.display(),
        audio.display(),
        output.display(),
        video_secs,
        audio_secs
    );

    let cmd = FfmpegCommand::new(video, output)
        .add_input(audio)
        .map("0:v")
        .map("1:a")
        .video_codec("copy")
        .audio_codec("aac")
        .audio_bitrate("128k")
        .output_arg("-shortest")
        .output_args(["-movflags", "+faststart"]);

    FfmpegRunner::new().run(&cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drift_error_formats_durations() {
        let err = MediaError::MuxTimingDrift {
            video_secs: 30.0,
            audio_secs: 29.2,
            tolerance_secs: 0.05,
        };
        let msg = err.to_string();
        assert!(msg.contains("30.000"));
        assert!(msg.contains("29.200"));
    }
}
