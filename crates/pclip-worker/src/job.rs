//! Batch job description.
//!
//! The serialized contract with the transcription and moment-selection
//! collaborators: a local source video, the full word-level transcript,
//! and the ordered candidate clip windows.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use pclip_models::{ClipWindow, TranscriptWord};

use crate::error::{WorkerError, WorkerResult};

/// One batch of clips to cut from a single source video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchJob {
    /// Local path to the already-downloaded source video
    pub source_video: PathBuf,
    /// Destination key prefix; clip `i` publishes to `{prefix}/clip_{i}.mp4`
    pub output_prefix: String,
    /// Candidate clip windows, ordered, non-overlapping by contract
    pub windows: Vec<ClipWindow>,
    /// Full word-level transcript of the source video
    pub transcript: Vec<TranscriptWord>,
}

impl BatchJob {
    /// Load a batch job from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> WorkerResult<Self> {
        let raw = tokio::fs::read(path.as_ref()).await?;
        let job: BatchJob = serde_json::from_slice(&raw)?;
        job.validate()?;
        Ok(job)
    }

    /// Validate the parts of the contract this core depends on.
    fn validate(&self) -> WorkerResult<()> {
        if !self.source_video.exists() {
            return Err(WorkerError::invalid_job(format!(
                "Source video not found: {}",
                self.source_video.display()
            )));
        }
        if self.output_prefix.is_empty() {
            return Err(WorkerError::invalid_job("Empty output prefix"));
        }
        if self.windows.is_empty() {
            return Err(WorkerError::invalid_job("No clip windows"));
        }
        for (i, w) in self.windows.iter().enumerate() {
            if w.end <= w.start {
                return Err(WorkerError::invalid_job(format!(
                    "Window {} has non-positive duration ({:.3}s - {:.3}s)",
                    i, w.start, w.end
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_valid_job() {
        let dir = TempDir::new().unwrap();
        let video = dir.path().join("input.mp4");
        tokio::fs::write(&video, b"fake").await.unwrap();

        let job = BatchJob {
            source_video: video,
            output_prefix: "user1/video42".to_string(),
            windows: vec![ClipWindow::new(10.0, 40.0)],
            transcript: vec![TranscriptWord::new("hi", 12.0, 12.3)],
        };
        let path = dir.path().join("job.json");
        tokio::fs::write(&path, serde_json::to_vec(&job).unwrap())
            .await
            .unwrap();

        let loaded = BatchJob::load(&path).await.unwrap();
        assert_eq!(loaded.windows.len(), 1);
        assert_eq!(loaded.output_prefix, "user1/video42");
    }

    #[tokio::test]
    async fn test_rejects_inverted_window() {
        let dir = TempDir::new().unwrap();
        let video = dir.path().join("input.mp4");
        tokio::fs::write(&video, b"fake").await.unwrap();

        let job = BatchJob {
            source_video: video,
            output_prefix: "p".to_string(),
            windows: vec![ClipWindow::new(40.0, 10.0)],
            transcript: vec![],
        };
        let path = dir.path().join("job.json");
        tokio::fs::write(&path, serde_json::to_vec(&job).unwrap())
            .await
            .unwrap();

        let err = BatchJob::load(&path).await.unwrap_err();
        assert!(matches!(err, WorkerError::InvalidJob(_)));
    }

    #[tokio::test]
    async fn test_rejects_missing_source() {
        let dir = TempDir::new().unwrap();
        let job = BatchJob {
            source_video: dir.path().join("missing.mp4"),
            output_prefix: "p".to_string(),
            windows: vec![ClipWindow::new(0.0, 10.0)],
            transcript: vec![],
        };
        let path = dir.path().join("job.json");
        tokio::fs::write(&path, serde_json::to_vec(&job).unwrap())
            .await
            .unwrap();

        let err = BatchJob::load(&path).await.unwrap_err();
        assert!(matches!(err, WorkerError::InvalidJob(_)));
    }
}
