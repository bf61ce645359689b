//! Caption burn-in via the FFmpeg subtitles filter.

use std::path::Path;
use tracing::{debug, info};

use pclip_models::{format_srt_timestamp, CaptionCue};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::config::SubtitleStyle;
use crate::error::{MediaError, MediaResult};

/// Write caption cues as an SRT file.
pub async fn write_srt(cues: &[CaptionCue], path: impl AsRef<Path>) -> MediaResult<()> {
    let mut srt = String::new();
    for (i, cue) in cues.iter().enumerate() {
        srt.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_srt_timestamp(cue.start),
            format_srt_timestamp(cue.end),
            cue.text
        ));
    }
    tokio::fs::write(path.as_ref(), srt).await?;
    Ok(())
}

/// Burn caption cues onto the video, leaving audio untouched.
///
/// With zero cues the input is copied through unchanged — an empty caption
/// window is valid, not an error. Any burn failure is `SubtitleRender` and
/// aborts only this clip.
pub async fn burn_captions(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    cues: &[CaptionCue],
    srt_path: impl AsRef<Path>,
    style: &SubtitleStyle,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();
    let srt_path = srt_path.as_ref();

    if cues.is_empty() {
        debug!("No caption cues for clip; copying video through");
        tokio::fs::copy(input, output).await?;
        return Ok(());
    }

    write_srt(cues, srt_path).await?;

    info!(
        "Burning {} caption cues: {} -> {}",
        cues.len(),
        input.display(),
        output.display()
    );

    let filter = format!(
        "subtitles='{}':force_style='{}'",
        escape_subtitle_path(srt_path),
        style.force_style()
    );

    let cmd = FfmpegCommand::new(input, output)
        .video_filter(filter)
        .video_codec("libx264")
        .preset("veryfast")
        .crf(21)
        .audio_codec("copy")
        .output_args(["-movflags", "+faststart"]);

    FfmpegRunner::new().run(&cmd).await.map_err(|e| {
        MediaError::subtitle_render(format!("Caption burn failed for {}: {}", output.display(), e))
    })
}

/// Escape a subtitle path for the FFmpeg subtitles filter.
fn escape_subtitle_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace('\'', "\\'")
}
