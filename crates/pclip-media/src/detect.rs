//! Speaker detection interface and artifact loading.
//!
//! The active-speaker detector is an external process: the pipeline writes
//! a clip segment and its audio into the workspace, invokes the detector
//! once, and reads back two JSON artifacts — a track list and an aligned
//! score list. The `SpeakerDetect` trait keeps that process swappable with
//! an in-process model without touching the planner.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use pclip_models::{ScoreSeries, Track};

use crate::error::{MediaError, MediaResult};
use crate::workspace::ClipWorkspace;

/// Active-speaker detection capability.
#[async_trait]
pub trait SpeakerDetect: Send + Sync {
    /// Run detection for the segment in `workspace` and return aligned
    /// track/score pairs. An empty list means no faces were found, which
    /// is valid — the planner falls back to centered framing.
    async fn detect(&self, workspace: &ClipWorkspace) -> MediaResult<Vec<(Track, ScoreSeries)>>;
}

/// Detector backed by an external command.
///
/// Invoked synchronously once per clip, single-flight with respect to its
/// workspace. The command receives the segment, audio and workspace paths
/// and must write `tracks.json` and `scores.json` into the workspace.
pub struct CommandSpeakerDetector {
    program: PathBuf,
    extra_args: Vec<String>,
    timeout_secs: u64,
}

impl CommandSpeakerDetector {
    /// Create a detector invoking `program`.
    pub fn new(program: impl Into<PathBuf>, extra_args: Vec<String>, timeout_secs: u64) -> Self {
        Self {
            program: program.into(),
            extra_args,
            timeout_secs,
        }
    }
}

#[async_trait]
impl SpeakerDetect for CommandSpeakerDetector {
    async fn detect(&self, workspace: &ClipWorkspace) -> MediaResult<Vec<(Track, ScoreSeries)>> {
        which::which(&self.program)
            .map_err(|_| MediaError::DetectorNotFound(self.program.display().to_string()))?;

        info!(
            "Running speaker detector: {} (workspace: {})",
            self.program.display(),
            workspace.root().display()
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.extra_args)
            .arg("--video")
            .arg(workspace.segment_path())
            .arg("--audio")
            .arg(workspace.audio_path())
            .arg("--workdir")
            .arg(workspace.root())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = tokio::time::timeout(
            std::time::Duration::from_secs(self.timeout_secs),
            cmd.output(),
        )
        .await
        .map_err(|_| MediaError::Timeout(self.timeout_secs))??;

        if !output.status.success() {
            return Err(MediaError::detection_data(format!(
                "Speaker detector exited with status {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        load_detection_artifacts(workspace).await
    }
}

/// Load and validate the detector's track/score artifacts.
///
/// Missing or unreadable artifacts, unknown track ids, or a track whose
/// score series has a different length are all `DetectionData` errors.
/// An empty track list with an empty score list is valid.
pub async fn load_detection_artifacts(
    workspace: &ClipWorkspace,
) -> MediaResult<Vec<(Track, ScoreSeries)>> {
    let tracks_path = workspace.tracks_path();
    let scores_path = workspace.scores_path();

    let tracks_raw = tokio::fs::read(&tracks_path).await.map_err(|e| {
        MediaError::detection_data(format!(
            "Tracks artifact missing or unreadable at {}: {}",
            tracks_path.display(),
            e
        ))
    })?;
    let scores_raw = tokio::fs::read(&scores_path).await.map_err(|e| {
        MediaError::detection_data(format!(
            "Scores artifact missing or unreadable at {}: {}",
            scores_path.display(),
            e
        ))
    })?;

    let tracks: Vec<Track> = serde_json::from_slice(&tracks_raw)
        .map_err(|e| MediaError::detection_data(format!("Malformed tracks artifact: {}", e)))?;
    let mut scores: Vec<ScoreSeries> = serde_json::from_slice(&scores_raw)
        .map_err(|e| MediaError::detection_data(format!("Malformed scores artifact: {}", e)))?;

    if tracks.len() != scores.len() {
        return Err(MediaError::detection_data(format!(
            "Track/score count mismatch: {} tracks, {} score series",
            tracks.len(),
            scores.len()
        )));
    }

    let mut pairs = Vec::with_capacity(tracks.len());
    for track in tracks {
        let pos = scores
            .iter()
            .position(|s| s.track_id == track.track_id)
            .ok_or_else(|| {
                MediaError::detection_data(format!(
                    "No score series for track {}",
                    track.track_id
                ))
            })?;
        let series = scores.swap_remove(pos);

        if !series.is_aligned_with(&track) {
            return Err(MediaError::detection_data(format!(
                "Score series misaligned for track {}: track covers {} frames from {}, \
                 scores cover {} frames from {}",
                track.track_id,
                track.boxes.len(),
                track.first_frame,
                series.scores.len(),
                series.first_frame
            )));
        }

        pairs.push((track, series));
    }

    debug!("Loaded {} track/score pairs", pairs.len());
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pclip_models::FaceBox;
    use tempfile::TempDir;

    async fn workspace_with_artifacts(
        tracks: &[Track],
        scores: &[ScoreSeries],
    ) -> (TempDir, ClipWorkspace) {
        let dir = TempDir::new().unwrap();
        let ws = ClipWorkspace::create(dir.path(), 0).await.unwrap();
        tokio::fs::write(ws.tracks_path(), serde_json::to_vec(tracks).unwrap())
            .await
            .unwrap();
        tokio::fs::write(ws.scores_path(), serde_json::to_vec(scores).unwrap())
            .await
            .unwrap();
        (dir, ws)
    }

    fn track(id: u32, first: u32, len: usize) -> Track {
        let boxes = (0..len)
            .map(|_| FaceBox::new(100.0, 100.0, 50.0, 50.0))
            .collect();
        Track::new(id, first, boxes)
    }

    #[tokio::test]
    async fn test_load_valid_artifacts() {
        let tracks = vec![track(1, 0, 10), track(2, 5, 10)];
        let scores = vec![
            ScoreSeries::new(2, 5, vec![0.8; 10]),
            ScoreSeries::new(1, 0, vec![0.9; 10]),
        ];
        let (_dir, ws) = workspace_with_artifacts(&tracks, &scores).await;

        let pairs = load_detection_artifacts(&ws).await.unwrap();
        assert_eq!(pairs.len(), 2);
        // Pairs follow track order, matched by id
        assert_eq!(pairs[0].0.track_id, pairs[0].1.track_id);
        assert_eq!(pairs[1].0.track_id, pairs[1].1.track_id);
    }

    #[tokio::test]
    async fn test_empty_artifacts_are_valid() {
        let (_dir, ws) = workspace_with_artifacts(&[], &[]).await;
        let pairs = load_detection_artifacts(&ws).await.unwrap();
        assert!(pairs.is_empty());
    }

    #[tokio::test]
    async fn test_missing_tracks_artifact() {
        let dir = TempDir::new().unwrap();
        let ws = ClipWorkspace::create(dir.path(), 0).await.unwrap();
        tokio::fs::write(ws.scores_path(), b"[]").await.unwrap();

        let err = load_detection_artifacts(&ws).await.unwrap_err();
        assert!(matches!(err, MediaError::DetectionData(_)));
    }

    #[tokio::test]
    async fn test_length_mismatch_rejected() {
        let tracks = vec![track(1, 0, 10)];
        let scores = vec![ScoreSeries::new(1, 0, vec![0.9; 9])];
        let (_dir, ws) = workspace_with_artifacts(&tracks, &scores).await;

        let err = load_detection_artifacts(&ws).await.unwrap_err();
        assert!(matches!(err, MediaError::DetectionData(_)));
    }

    #[tokio::test]
    async fn test_unmatched_track_id_rejected() {
        let tracks = vec![track(1, 0, 10)];
        let scores = vec![ScoreSeries::new(9, 0, vec![0.9; 10])];
        let (_dir, ws) = workspace_with_artifacts(&tracks, &scores).await;

        let err = load_detection_artifacts(&ws).await.unwrap_err();
        assert!(matches!(err, MediaError::DetectionData(_)));
    }

    #[tokio::test]
    async fn test_malformed_json_rejected() {
        let dir = TempDir::new().unwrap();
        let ws = ClipWorkspace::create(dir.path(), 0).await.unwrap();
        tokio::fs::write(ws.tracks_path(), b"not json").await.unwrap();
        tokio::fs::write(ws.scores_path(), b"[]").await.unwrap();

        let err = load_detection_artifacts(&ws).await.unwrap_err();
        assert!(matches!(err, MediaError::DetectionData(_)));
    }
}
