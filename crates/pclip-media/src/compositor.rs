//! Frame compositing of a planned crop path onto the vertical canvas.
//!
//! Renders the whole clip in a single FFmpeg pass: a `sendcmd`-driven
//! dynamic crop follows the planned path frame-accurately, then the crop
//! is scaled onto the fixed output canvas. A single pass keeps timestamps
//! continuous and guarantees the output frame count matches the input 1:1.
//!
//! The output is silent video; audio is muxed back in afterwards.

use std::path::Path;
use tracing::{debug, info};

use pclip_models::CropFrame;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::config::{CanvasBackground, ReframeConfig};
use crate::error::{MediaError, MediaResult};

/// Compositor rendering crop paths through FFmpeg.
pub struct FrameCompositor<'a> {
    config: &'a ReframeConfig,
}

impl<'a> FrameCompositor<'a> {
    /// Create a new compositor.
    pub fn new(config: &'a ReframeConfig) -> Self {
        Self { config }
    }

    /// Render `input` through the crop path into `output`.
    ///
    /// `script_path` receives the generated sendcmd crop script. Any FFmpeg
    /// failure is a `Decode` error and the partial output is removed.
    pub async fn render(
        &self,
        input: &Path,
        output: &Path,
        crop_frames: &[CropFrame],
        fps: f64,
        script_path: &Path,
    ) -> MediaResult<()> {
        if crop_frames.is_empty() {
            return Err(MediaError::decode("Empty crop path"));
        }
        if fps <= 0.0 {
            return Err(MediaError::decode(format!("Invalid frame rate: {}", fps)));
        }

        let script = build_sendcmd_script(crop_frames, fps);
        tokio::fs::write(script_path, script).await?;

        let filter = self.build_filter(crop_frames, script_path);
        debug!("Compositor filter graph: {}", filter);

        info!(
            "Compositing {} frames: {} -> {}",
            crop_frames.len(),
            input.display(),
            output.display()
        );

        let cmd = FfmpegCommand::new(input, output)
            .filter_complex(filter)
            .map("[vout]")
            .no_audio()
            .video_codec("libx264")
            .preset(&self.config.render_preset)
            .crf(self.config.render_crf)
            .output_args(["-pix_fmt", "yuv420p"]);

        let result = FfmpegRunner::new().run(&cmd).await;

        if let Err(e) = result {
            // Never leave a partial render behind.
            let _ = tokio::fs::remove_file(output).await;
            return Err(MediaError::decode(format!(
                "Crop path render failed: {}",
                e
            )));
        }

        Ok(())
    }

    /// Build the filter graph: dynamic crop, scale to canvas, background fill.
    fn build_filter(&self, crop_frames: &[CropFrame], script_path: &Path) -> String {
        let first = &crop_frames[0].rect;
        let cw = self.config.canvas_width;
        let ch = self.config.canvas_height;

        let crop_chain = format!(
            "sendcmd=f='{script}',crop@dyn=w={w}:h={h}:x={x}:y={y}:exact=1",
            script = escape_filter_path(script_path),
            w = first.width,
            h = first.height,
            x = first.x,
            y = first.y,
        );

        match &self.config.background {
            CanvasBackground::Solid(color) => format!(
                "[0:v]{crop},scale={cw}:{ch}:force_original_aspect_ratio=decrease:flags=lanczos,\
                 pad={cw}:{ch}:(ow-iw)/2:(oh-ih)/2:color={color},setsar=1[vout]",
                crop = crop_chain,
            ),
            CanvasBackground::Blur => format!(
                "[0:v]{crop},split=2[fg][bg];\
                 [bg]scale={cw}:{ch}:force_original_aspect_ratio=increase,\
                 crop={cw}:{ch},boxblur=luma_radius=32:luma_power=2[bgb];\
                 [fg]scale={cw}:{ch}:force_original_aspect_ratio=decrease:flags=lanczos[fgs];\
                 [bgb][fgs]overlay=(W-w)/2:(H-h)/2,setsar=1[vout]",
                crop = crop_chain,
            ),
        }
    }
}

/// Build the sendcmd script: one crop update per change of rectangle.
///
/// Crop width/height are constant across a planned path, so only the
/// offsets are re-commanded.
pub fn build_sendcmd_script(crop_frames: &[CropFrame], fps: f64) -> String {
    let mut lines = Vec::new();
    let mut prev = None;

    for cf in crop_frames {
        if prev == Some(cf.rect) {
            continue;
        }
        let time = cf.frame as f64 / fps;
        lines.push(format!(
            "{:.4} [enter] crop@dyn x {}, crop@dyn y {};",
            time, cf.rect.x, cf.rect.y
        ));
        prev = Some(cf.rect);
    }

    lines.join("\n") + "\n"
}

/// Escape a path for use inside an FFmpeg filter argument.
fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pclip_models::{CropRect, CropState};
    use std::path::PathBuf;

    fn frame(i: u32, x: i32) -> CropFrame {
        CropFrame {
            frame: i,
            track_id: Some(1),
            rect: CropRect::new(x, 0, 608, 1080),
            state: CropState::Tracking,
        }
    }

    #[test]
    fn test_sendcmd_script_dedupes_static_runs() {
        let frames = vec![frame(0, 100), frame(1, 100), frame(2, 100), frame(3, 140)];
        let script = build_sendcmd_script(&frames, 30.0);

        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0.0000 "));
        assert!(lines[0].contains("crop@dyn x 100"));
        assert!(lines[1].starts_with("0.1000 "));
        assert!(lines[1].contains("crop@dyn x 140"));
    }

    #[test]
    fn test_sendcmd_times_follow_fps() {
        let frames = vec![frame(0, 0), frame(60, 50)];
        let script = build_sendcmd_script(&frames, 30.0);
        assert!(script.contains("2.0000 [enter]"));
    }

    #[test]
    fn test_escape_filter_path() {
        let p = PathBuf::from("/tmp/work/clip_0/crop_cmds.txt");
        assert_eq!(escape_filter_path(&p), "/tmp/work/clip_0/crop_cmds.txt");

        let windowsy = PathBuf::from("C:/x'y.txt");
        let escaped = escape_filter_path(&windowsy);
        assert!(escaped.contains("\\:"));
        assert!(escaped.contains("\\'"));
    }

    #[test]
    fn test_solid_background_filter_shape() {
        let config = ReframeConfig::default();
        let comp = FrameCompositor::new(&config);
        let frames = vec![frame(0, 100)];
        let filter = comp.build_filter(&frames, Path::new("/tmp/cmds.txt"));

        assert!(filter.contains("crop@dyn=w=608:h=1080:x=100:y=0"));
        assert!(filter.contains("pad=1080:1920"));
        assert!(filter.contains("color=black"));
        assert!(filter.ends_with("[vout]"));
    }

    #[test]
    fn test_blur_background_filter_shape() {
        let config = ReframeConfig {
            background: CanvasBackground::Blur,
            ..ReframeConfig::default()
        };
        let comp = FrameCompositor::new(&config);
        let frames = vec![frame(0, 100)];
        let filter = comp.build_filter(&frames, Path::new("/tmp/cmds.txt"));

        assert!(filter.contains("boxblur"));
        assert!(filter.contains("overlay"));
        assert!(!filter.contains("pad="));
    }
}
