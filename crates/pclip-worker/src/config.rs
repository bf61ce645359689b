//! Worker configuration.

use std::time::Duration;

use pclip_media::{AspectRatio, CanvasBackground, ReframeConfig};

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Maximum clips processed concurrently (codec/GPU bound)
    pub max_parallel_clips: usize,
    /// Maximum clips accepted per batch; extra windows are dropped
    pub max_clips_per_batch: usize,
    /// Wall-clock budget for a whole batch
    pub batch_timeout: Duration,
    /// Work directory for clip workspaces
    pub work_dir: String,
    /// External speaker detector command
    pub detector_program: String,
    /// Extra arguments passed to the detector before the standard ones
    pub detector_args: Vec<String>,
    /// Per-invocation detector timeout
    pub detector_timeout: Duration,
    /// Root directory finished clips are published under
    pub publish_root: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_parallel_clips: 2,
            max_clips_per_batch: 5,
            batch_timeout: Duration::from_secs(900), // 15 minutes
            work_dir: "/tmp/pclip".to_string(),
            detector_program: "speaker-detector".to_string(),
            detector_args: Vec::new(),
            detector_timeout: Duration::from_secs(300),
            publish_root: "/tmp/pclip-out".to_string(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_parallel_clips: env_parse("PCLIP_MAX_PARALLEL", defaults.max_parallel_clips),
            max_clips_per_batch: env_parse("PCLIP_MAX_CLIPS", defaults.max_clips_per_batch),
            batch_timeout: Duration::from_secs(env_parse("PCLIP_BATCH_TIMEOUT_SECS", 900)),
            work_dir: std::env::var("PCLIP_WORK_DIR").unwrap_or(defaults.work_dir),
            detector_program: std::env::var("PCLIP_DETECTOR").unwrap_or(defaults.detector_program),
            detector_args: std::env::var("PCLIP_DETECTOR_ARGS")
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
            detector_timeout: Duration::from_secs(env_parse("PCLIP_DETECTOR_TIMEOUT_SECS", 300)),
            publish_root: std::env::var("PCLIP_PUBLISH_ROOT").unwrap_or(defaults.publish_root),
        }
    }
}

/// Build the reframing configuration from environment variables,
/// falling back to the documented defaults.
pub fn reframe_config_from_env() -> ReframeConfig {
    let defaults = ReframeConfig::default();
    ReframeConfig {
        target_aspect: std::env::var("PCLIP_TARGET_ASPECT")
            .ok()
            .and_then(|s| AspectRatio::parse(&s))
            .unwrap_or(defaults.target_aspect),
        activation_threshold: env_parse("PCLIP_ACTIVATION_THRESHOLD", defaults.activation_threshold),
        switch_margin: env_parse("PCLIP_SWITCH_MARGIN", defaults.switch_margin),
        switch_frames: env_parse("PCLIP_SWITCH_FRAMES", defaults.switch_frames),
        freeze_frames: env_parse("PCLIP_FREEZE_FRAMES", defaults.freeze_frames),
        center_smoothing: env_parse("PCLIP_CENTER_SMOOTHING", defaults.center_smoothing),
        max_center_velocity: env_parse("PCLIP_MAX_CENTER_VELOCITY", defaults.max_center_velocity),
        max_words_per_cue: env_parse("PCLIP_MAX_WORDS_PER_CUE", defaults.max_words_per_cue),
        background: match std::env::var("PCLIP_CANVAS_BACKGROUND").as_deref() {
            Ok("blur") => CanvasBackground::Blur,
            Ok(color) if !color.is_empty() => CanvasBackground::Solid(color.to_string()),
            _ => defaults.background,
        },
        canvas_width: env_parse("PCLIP_CANVAS_WIDTH", defaults.canvas_width),
        canvas_height: env_parse("PCLIP_CANVAS_HEIGHT", defaults.canvas_height),
        render_preset: std::env::var("PCLIP_RENDER_PRESET").unwrap_or(defaults.render_preset),
        render_crf: env_parse("PCLIP_RENDER_CRF", defaults.render_crf),
        mux_drift_tolerance_secs: env_parse(
            "PCLIP_MUX_DRIFT_TOLERANCE_SECS",
            defaults.mux_drift_tolerance_secs,
        ),
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.max_parallel_clips, 2);
        assert_eq!(config.max_clips_per_batch, 5);
        assert_eq!(config.batch_timeout, Duration::from_secs(900));
    }
}
