//! Clip publishing interface.
//!
//! The storage collaborator is consumed through a narrow trait: one final
//! artifact per successfully completed clip, nothing for failed clips.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{WorkerError, WorkerResult};

/// Destination key for a clip index under a batch prefix.
pub fn clip_key(prefix: &str, index: usize) -> String {
    format!("{}/clip_{}.mp4", prefix.trim_end_matches('/'), index)
}

/// Publishing capability for finished clips.
#[async_trait]
pub trait ClipStore: Send + Sync {
    /// Publish a local artifact under the given key.
    async fn publish(&self, local: &Path, key: &str) -> WorkerResult<()>;
}

/// Store that publishes clips into a local directory tree.
pub struct LocalDirStore {
    root: PathBuf,
}

impl LocalDirStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolved destination path for a key.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl ClipStore for LocalDirStore {
    async fn publish(&self, local: &Path, key: &str) -> WorkerResult<()> {
        let dest = self.path_for(key);
        pclip_media::fs_utils::move_file(local, &dest)
            .await
            .map_err(|e| {
                WorkerError::upload(format!("Failed to publish {} to {}: {}", local.display(), key, e))
            })?;
        info!("Published clip: {}", dest.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clip_key_format() {
        assert_eq!(clip_key("user1/video42", 0), "user1/video42/clip_0.mp4");
        assert_eq!(clip_key("user1/video42/", 3), "user1/video42/clip_3.mp4");
    }

    #[tokio::test]
    async fn test_local_store_publish() {
        let work = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        let local = work.path().join("final.mp4");
        tokio::fs::write(&local, b"clip").await.unwrap();

        let store = LocalDirStore::new(out.path());
        store
            .publish(&local, &clip_key("user1/video42", 2))
            .await
            .unwrap();

        let published = out.path().join("user1/video42/clip_2.mp4");
        assert_eq!(tokio::fs::read(&published).await.unwrap(), b"clip");
        assert!(!local.exists());
    }
}
