//! Configuration for the speaker-aware reframing pipeline.

use serde::{Deserialize, Serialize};

/// Target aspect ratio for output video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AspectRatio {
    /// Width component
    pub width: u32,
    /// Height component
    pub height: u32,
}

impl AspectRatio {
    /// Create a new aspect ratio.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns width/height as float.
    pub fn ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Parse a "W:H" string.
    pub fn parse(s: &str) -> Option<Self> {
        let (w, h) = s.split_once(':')?;
        let width: u32 = w.trim().parse().ok()?;
        let height: u32 = h.trim().parse().ok()?;
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }

    /// Portrait 9:16 (TikTok, Shorts, Reels)
    pub const PORTRAIT: AspectRatio = AspectRatio {
        width: 9,
        height: 16,
    };
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Canvas fill behind crops narrower than the output canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanvasBackground {
    /// Solid color pad (FFmpeg color name or 0xRRGGBB)
    Solid(String),
    /// Blurred copy of the source fills the canvas
    Blur,
}

impl Default for CanvasBackground {
    fn default() -> Self {
        Self::Solid("black".to_string())
    }
}

/// Configuration for the reframing pipeline.
///
/// The planner constants exist because the observed behavior requires them,
/// not because any particular value is canonical; all of them are tunable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReframeConfig {
    /// Target output aspect ratio (default: 9:16)
    pub target_aspect: AspectRatio,

    // === Speaker selection ===
    /// Minimum confidence for a track to be considered active (default: 0.4)
    pub activation_threshold: f64,

    /// Confidence lead a challenger needs over the active track (default: 0.05)
    pub switch_margin: f64,

    /// Consecutive leading frames required before a switch (default: 10)
    pub switch_frames: u32,

    /// Frames to hold the last rectangle after the active track vanishes
    /// before degrading to fallback framing (default: 15)
    pub freeze_frames: u32,

    // === Camera smoothing ===
    /// Exponential moving average factor for the crop center;
    /// higher is more responsive, lower is steadier (default: 0.35)
    pub center_smoothing: f64,

    /// Maximum crop-center displacement in pixels per frame outside
    /// freeze/fallback transitions (default: 40.0)
    pub max_center_velocity: f64,

    // === Captions ===
    /// Maximum words per caption cue (default: 5)
    pub max_words_per_cue: usize,

    // === Canvas ===
    /// Fill for padded regions (default: solid black)
    pub background: CanvasBackground,

    /// Output canvas width (default: 1080)
    pub canvas_width: u32,

    /// Output canvas height (default: 1920)
    pub canvas_height: u32,

    // === Encoding ===
    /// FFmpeg x264 preset (default: "veryfast")
    pub render_preset: String,

    /// FFmpeg CRF quality (default: 21)
    pub render_crf: u32,

    // === Muxing ===
    /// Tolerated audio/video duration discrepancy in seconds (default: 0.05)
    pub mux_drift_tolerance_secs: f64,
}

impl Default for ReframeConfig {
    fn default() -> Self {
        Self {
            target_aspect: AspectRatio::PORTRAIT,

            activation_threshold: 0.4,
            switch_margin: 0.05,
            switch_frames: 10,
            freeze_frames: 15,

            center_smoothing: 0.35,
            max_center_velocity: 40.0,

            max_words_per_cue: 5,

            background: CanvasBackground::default(),
            canvas_width: 1080,
            canvas_height: 1920,

            render_preset: "veryfast".to_string(),
            render_crf: 21,

            mux_drift_tolerance_secs: 0.05,
        }
    }
}

/// Static styling for burned-in captions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleStyle {
    /// Font family name
    pub font: String,
    /// Font size in ASS units
    pub font_size: u32,
    /// Vertical margin from the bottom edge
    pub margin_v: u32,
    /// Outline thickness
    pub outline: u32,
    /// Primary text color in ASS &HBBGGRR& form
    pub primary_colour: String,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font: "Anton".to_string(),
            font_size: 18,
            margin_v: 60,
            outline: 2,
            primary_colour: "&H00FFFFFF&".to_string(),
        }
    }
}

impl SubtitleStyle {
    /// Render as an ASS `force_style` argument for the subtitles filter.
    pub fn force_style(&self) -> String {
        format!(
            "FontName={},FontSize={},PrimaryColour={},Outline={},MarginV={},Alignment=2",
            self.font, self.font_size, self.primary_colour, self.outline, self.margin_v
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_parse() {
        assert_eq!(AspectRatio::parse("9:16"), Some(AspectRatio::PORTRAIT));
        assert_eq!(AspectRatio::parse("1:1"), Some(AspectRatio::new(1, 1)));
        assert_eq!(AspectRatio::parse("0:16"), None);
        assert_eq!(AspectRatio::parse("9x16"), None);
    }

    #[test]
    fn test_force_style_contains_fields() {
        let style = SubtitleStyle::default();
        let fs = style.force_style();
        assert!(fs.contains("FontName=Anton"));
        assert!(fs.contains("Alignment=2"));
    }
}
