//! Per-clip processing pipeline.
//!
//! Each clip advances through a strictly sequential state machine; no
//! stage is skipped. A failure at any stage records the last completed
//! stage and the cause, and never propagates to sibling clips. The clip
//! workspace is released on every exit path.

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

use pclip_media::{
    burn_captions, extract_audio, extract_segment, mux_audio, probe_video, segment_captions,
    ClipWorkspace, CropPathPlanner, FrameCompositor, ReframeConfig, SpeakerDetect, SubtitleStyle,
};
use pclip_models::{ClipWindow, TranscriptWord};

use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::store::{clip_key, ClipStore};

/// Pipeline stage for one clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipStage {
    Initialized,
    SegmentExtracted,
    AudioExtracted,
    SpeakerDataReady,
    Reframed,
    AudioMuxed,
    SubtitlesBurned,
    Uploaded,
    Failed,
    CleanedUp,
}

impl ClipStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClipStage::Initialized => "initialized",
            ClipStage::SegmentExtracted => "segment_extracted",
            ClipStage::AudioExtracted => "audio_extracted",
            ClipStage::SpeakerDataReady => "speaker_data_ready",
            ClipStage::Reframed => "reframed",
            ClipStage::AudioMuxed => "audio_muxed",
            ClipStage::SubtitlesBurned => "subtitles_burned",
            ClipStage::Uploaded => "uploaded",
            ClipStage::Failed => "failed",
            ClipStage::CleanedUp => "cleaned_up",
        }
    }
}

impl std::fmt::Display for ClipStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared, read-only context for clip processing.
pub struct ClipContext {
    pub worker: WorkerConfig,
    pub reframe: ReframeConfig,
    pub subtitle_style: SubtitleStyle,
    pub detector: Arc<dyn SpeakerDetect>,
    pub store: Arc<dyn ClipStore>,
}

/// A successfully published clip.
#[derive(Debug, Clone, Serialize)]
pub struct ClipSuccess {
    pub index: usize,
    pub key: String,
    pub duration_secs: f64,
    pub caption_count: usize,
}

/// A clip that failed, with the last completed stage and the cause.
#[derive(Debug, Clone, Serialize)]
pub struct ClipFailure {
    pub index: usize,
    pub stage: ClipStage,
    pub error: String,
}

/// Process one clip end-to-end inside its own workspace.
pub async fn process_clip(
    ctx: &ClipContext,
    source: &Path,
    transcript: &[TranscriptWord],
    window: ClipWindow,
    index: usize,
    batch_dir: &Path,
    output_prefix: &str,
) -> Result<ClipSuccess, ClipFailure> {
    info!(
        clip_index = index,
        start = window.start,
        end = window.end,
        "Starting clip processing"
    );

    let workspace = match ClipWorkspace::create(batch_dir, index).await {
        Ok(ws) => ws,
        Err(e) => {
            error!(clip_index = index, error = %e, "Failed to create clip workspace");
            return Err(ClipFailure {
                index,
                stage: ClipStage::Initialized,
                error: e.to_string(),
            });
        }
    };

    let result = run_stages(ctx, source, transcript, window, index, &workspace, output_prefix).await;

    if let Err((stage, e)) = &result {
        error!(
            clip_index = index,
            stage = %ClipStage::Failed,
            last_stage = %stage,
            error = %e,
            "Clip failed"
        );
    }

    // Release the workspace on success and failure alike.
    if let Err(e) = workspace.release().await {
        warn!(clip_index = index, error = %e, "Failed to release clip workspace");
    }

    match result {
        Ok(success) => {
            info!(
                clip_index = index,
                stage = %ClipStage::CleanedUp,
                key = %success.key,
                captions = success.caption_count,
                "Clip completed and cleaned up"
            );
            Ok(success)
        }
        Err((stage, e)) => {
            info!(clip_index = index, stage = %ClipStage::CleanedUp, "Workspace released after failure");
            Err(ClipFailure {
                index,
                stage,
                error: e.to_string(),
            })
        }
    }
}

/// Advance the clip through every stage in order.
///
/// Returns the last completed stage alongside the error on failure.
async fn run_stages(
    ctx: &ClipContext,
    source: &Path,
    transcript: &[TranscriptWord],
    window: ClipWindow,
    index: usize,
    ws: &ClipWorkspace,
    output_prefix: &str,
) -> Result<ClipSuccess, (ClipStage, WorkerError)> {
    let mut stage = ClipStage::Initialized;

    extract_segment(source, &ws.segment_path(), window.start, window.duration())
        .await
        .map_err(|e| (stage, e.into()))?;
    stage = ClipStage::SegmentExtracted;
    info!(clip_index = index, stage = %stage, "Stage complete");

    extract_audio(&ws.segment_path(), &ws.audio_path())
        .await
        .map_err(|e| (stage, e.into()))?;
    stage = ClipStage::AudioExtracted;
    info!(clip_index = index, stage = %stage, "Stage complete");

    let pairs = ctx
        .detector
        .detect(ws)
        .await
        .map_err(|e| (stage, e.into()))?;
    stage = ClipStage::SpeakerDataReady;
    info!(
        clip_index = index,
        stage = %stage,
        tracks = pairs.len(),
        "Stage complete"
    );

    let segment_info = probe_video(&ws.segment_path())
        .await
        .map_err(|e| (stage, e.into()))?;
    let frame_count = ((segment_info.duration * segment_info.fps).round() as u32).max(1);

    let planner = CropPathPlanner::new(&ctx.reframe, segment_info.width, segment_info.height);
    let crop_path = planner.plan(&pairs, frame_count);

    FrameCompositor::new(&ctx.reframe)
        .render(
            &ws.segment_path(),
            &ws.reframed_path(),
            &crop_path,
            segment_info.fps,
            &ws.sendcmd_path(),
        )
        .await
        .map_err(|e| (stage, e.into()))?;
    stage = ClipStage::Reframed;
    info!(
        clip_index = index,
        stage = %stage,
        frames = crop_path.len(),
        "Stage complete"
    );

    mux_audio(
        &ws.reframed_path(),
        &ws.audio_path(),
        &ws.muxed_path(),
        ctx.reframe.mux_drift_tolerance_secs,
    )
    .await
    .map_err(|e| (stage, e.into()))?;
    stage = ClipStage::AudioMuxed;
    info!(clip_index = index, stage = %stage, "Stage complete");

    let cues = segment_captions(transcript, &window, ctx.reframe.max_words_per_cue);
    burn_captions(
        &ws.muxed_path(),
        &ws.final_path(),
        &cues,
        &ws.captions_path(),
        &ctx.subtitle_style,
    )
    .await
    .map_err(|e| (stage, e.into()))?;
    stage = ClipStage::SubtitlesBurned;
    info!(clip_index = index, stage = %stage, cues = cues.len(), "Stage complete");

    let key = clip_key(output_prefix, index);
    ctx.store
        .publish(&ws.final_path(), &key)
        .await
        .map_err(|e| (stage, e))?;
    stage = ClipStage::Uploaded;
    info!(clip_index = index, stage = %stage, key = %key, "Stage complete");

    Ok(ClipSuccess {
        index,
        key,
        duration_secs: window.duration(),
        caption_count: cues.len(),
    })
}
