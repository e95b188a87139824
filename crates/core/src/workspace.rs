//! Per-run temporary filesystem layout.
//!
//! Each pipeline run owns a uuid-named directory tree under the system
//! temp dir, so concurrent runs never collide. The whole tree is removed
//! at run end whether the run succeeded or failed.

use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// Temporary working set for a single pipeline run.
#[derive(Debug, Clone)]
pub struct RunWorkspace {
    run_id: String,
    root: PathBuf,
}

impl RunWorkspace {
    /// Create a fresh workspace under `<system temp>/clipcast/<run-uuid>/`
    /// with all stage subdirectories present.
    pub async fn create() -> Result<Self, PipelineError> {
        Self::create_in(std::env::temp_dir()).await
    }

    /// Create a workspace rooted under an explicit base directory.
    pub async fn create_in(base: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let root = base.as_ref().join("clipcast").join(&run_id);
        let ws = Self { run_id, root };
        for dir in [
            ws.images_dir(),
            ws.audio_dir(),
            ws.frames_dir(),
            ws.scratch_dir(),
            ws.videos_dir(),
        ] {
            tokio::fs::create_dir_all(&dir).await?;
        }
        Ok(ws)
    }

    /// Unique identifier for this run.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Root of the run's temp tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Downloaded source images.
    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    /// Synthesized narration audio.
    pub fn audio_dir(&self) -> PathBuf {
        self.root.join("audio")
    }

    /// Images normalized to the output frame.
    pub fn frames_dir(&self) -> PathBuf {
        self.root.join("frames")
    }

    /// Scratch space for playlist files.
    pub fn scratch_dir(&self) -> PathBuf {
        self.root.join("scratch")
    }

    /// Assembled video output.
    pub fn videos_dir(&self) -> PathBuf {
        self.root.join("videos")
    }

    /// Remove the entire run tree. Best effort: a failure is logged and
    /// swallowed so cleanup never masks the run's real outcome.
    pub async fn remove(&self) {
        if let Err(e) = tokio::fs::remove_dir_all(&self.root).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(run_id = %self.run_id, error = %e, "failed to remove run workspace");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_makes_all_stage_directories() {
        let base = tempfile::tempdir().unwrap();
        let ws = RunWorkspace::create_in(base.path()).await.unwrap();
        for dir in [
            ws.images_dir(),
            ws.audio_dir(),
            ws.frames_dir(),
            ws.scratch_dir(),
            ws.videos_dir(),
        ] {
            assert!(dir.is_dir(), "{dir:?} missing");
        }
    }

    #[tokio::test]
    async fn two_runs_never_share_a_root() {
        let base = tempfile::tempdir().unwrap();
        let a = RunWorkspace::create_in(base.path()).await.unwrap();
        let b = RunWorkspace::create_in(base.path()).await.unwrap();
        assert_ne!(a.root(), b.root());
        assert_ne!(a.run_id(), b.run_id());
    }

    #[tokio::test]
    async fn remove_deletes_the_whole_tree() {
        let base = tempfile::tempdir().unwrap();
        let ws = RunWorkspace::create_in(base.path()).await.unwrap();
        tokio::fs::write(ws.images_dir().join("image_0.jpg"), b"x")
            .await
            .unwrap();
        ws.remove().await;
        assert!(!ws.root().exists());
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let base = tempfile::tempdir().unwrap();
        let ws = RunWorkspace::create_in(base.path()).await.unwrap();
        ws.remove().await;
        ws.remove().await;
        assert!(!ws.root().exists());
    }
}
