//! Per-clip scratch workspace.
//!
//! Every clip is processed inside an isolated directory with a fixed
//! internal layout. The workspace is released on every exit path; `Drop`
//! acts as a best-effort backstop if explicit release never ran.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::MediaResult;

/// Isolated scratch directory for one clip's processing.
#[derive(Debug)]
pub struct ClipWorkspace {
    root: PathBuf,
    released: bool,
}

impl ClipWorkspace {
    /// Create the workspace directory for a clip under `parent`.
    pub async fn create(parent: impl AsRef<Path>, clip_index: usize) -> MediaResult<Self> {
        let root = parent.as_ref().join(format!("clip_{}", clip_index));
        tokio::fs::create_dir_all(&root).await?;
        debug!("Created clip workspace: {}", root.display());
        Ok(Self {
            root,
            released: false,
        })
    }

    /// Workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Extracted clip segment (video+audio).
    pub fn segment_path(&self) -> PathBuf {
        self.root.join("segment.mp4")
    }

    /// Extracted 16 kHz mono WAV for the detector.
    pub fn audio_path(&self) -> PathBuf {
        self.root.join("audio.wav")
    }

    /// Detector track artifact.
    pub fn tracks_path(&self) -> PathBuf {
        self.root.join("tracks.json")
    }

    /// Detector score artifact.
    pub fn scores_path(&self) -> PathBuf {
        self.root.join("scores.json")
    }

    /// Crop command script consumed by the compositor's sendcmd filter.
    pub fn sendcmd_path(&self) -> PathBuf {
        self.root.join("crop_cmds.txt")
    }

    /// Reframed silent video.
    pub fn reframed_path(&self) -> PathBuf {
        self.root.join("reframed.mp4")
    }

    /// Reframed video with original audio muxed back in.
    pub fn muxed_path(&self) -> PathBuf {
        self.root.join("muxed.mp4")
    }

    /// Caption cues as SRT.
    pub fn captions_path(&self) -> PathBuf {
        self.root.join("captions.srt")
    }

    /// Final artifact with captions burned in.
    pub fn final_path(&self) -> PathBuf {
        self.root.join("final.mp4")
    }

    /// Remove the workspace directory and everything in it.
    pub async fn release(mut self) -> MediaResult<()> {
        self.released = true;
        debug!("Releasing clip workspace: {}", self.root.display());
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for ClipWorkspace {
    fn drop(&mut self) {
        if !self.released && self.root.exists() {
            if let Err(e) = std::fs::remove_dir_all(&self.root) {
                warn!(
                    "Failed to remove clip workspace {}: {}",
                    self.root.display(),
                    e
                );
            }
        }
    }
}
