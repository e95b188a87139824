//! The video assembly state machine:
//! Validate → ProbeAudio → ResizeImages → BuildPlaylist → Encode → Cleanup.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use clipcast_core::error::PipelineError;
use clipcast_core::traits::Assembler;
use clipcast_core::workspace::RunWorkspace;

use crate::encoder::{EncodeJob, Encoder};
use crate::ffmpeg::probe_duration;
use crate::playlist::{build_playlist, CONCAT_FILE_NAME};
use crate::resize::normalize_to_frame;

/// Assembles downloaded images and narration audio into one video whose
/// duration matches the audio.
pub struct VideoAssembler {
    encoder: Box<dyn Encoder>,
    frame: (u32, u32),
}

impl VideoAssembler {
    pub fn new(encoder: Box<dyn Encoder>, frame: (u32, u32)) -> Self {
        Self { encoder, frame }
    }

    /// Normalize every valid image into the frames directory. Individual
    /// failures are logged and dropped; zero survivors is fatal.
    ///
    /// Decode and resampling are CPU-bound, so each image runs on the
    /// blocking pool rather than a runtime thread.
    async fn normalize_all(
        &self,
        images: &[PathBuf],
        workspace: &RunWorkspace,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        let frames_dir = workspace.frames_dir();
        let mut frames = Vec::with_capacity(images.len());
        for (i, src) in images.iter().enumerate() {
            let dest = frames_dir.join(format!("frame_{i:03}.png"));
            let task_src = src.clone();
            let task_dest = dest.clone();
            let frame = self.frame;
            let result =
                tokio::task::spawn_blocking(move || normalize_to_frame(&task_src, &task_dest, frame))
                    .await
                    .map_err(|e| PipelineError::Io(std::io::Error::other(e)))?;
            match result {
                Ok(()) => frames.push(dest),
                Err(e) => {
                    tracing::warn!(image = %src.display(), error = %e, "dropping image that failed to normalize");
                }
            }
        }
        if frames.is_empty() {
            return Err(PipelineError::Input(
                "no images could be normalized".into(),
            ));
        }
        Ok(frames)
    }

    /// Playlist + encode, given an already-probed audio duration.
    async fn encode_frames(
        &self,
        frames: &[PathBuf],
        audio_secs: f64,
        audio: &Path,
        workspace: &RunWorkspace,
    ) -> Result<PathBuf, PipelineError> {
        let entries = build_playlist(frames, audio_secs)?;
        let output = workspace
            .videos_dir()
            .join(format!("video_{}.mp4", workspace.run_id()));
        let scratch_dir = workspace.scratch_dir();
        self.encoder
            .encode(EncodeJob {
                entries: &entries,
                audio,
                scratch_dir: &scratch_dir,
                output: &output,
            })
            .await
    }

    /// Remove resized frames and the playlist file. Runs whether the
    /// encode succeeded or failed.
    async fn cleanup(&self, frames: &[PathBuf], workspace: &RunWorkspace) {
        for frame in frames {
            if let Err(e) = tokio::fs::remove_file(frame).await {
                tracing::debug!(frame = %frame.display(), error = %e, "frame already gone");
            }
        }
        let playlist = workspace.scratch_dir().join(CONCAT_FILE_NAME);
        if playlist.exists() {
            if let Err(e) = tokio::fs::remove_file(&playlist).await {
                tracing::debug!(error = %e, "playlist already gone");
            }
        }
    }
}

/// Drop input paths that do not exist on local storage.
pub fn validate_paths(images: &[PathBuf]) -> Vec<PathBuf> {
    images.iter().filter(|p| p.exists()).cloned().collect()
}

#[async_trait]
impl Assembler for VideoAssembler {
    async fn assemble(
        &self,
        images: &[PathBuf],
        audio: &Path,
        workspace: &RunWorkspace,
    ) -> Result<PathBuf, PipelineError> {
        let valid = validate_paths(images);
        if valid.is_empty() {
            return Err(PipelineError::Input("no valid image paths".into()));
        }
        tracing::info!(
            total = images.len(),
            valid = valid.len(),
            "assembling video"
        );

        let audio_secs = probe_duration(audio).await?;
        let frames = self.normalize_all(&valid, workspace).await?;

        let result = self
            .encode_frames(&frames, audio_secs, audio, workspace)
            .await;
        self.cleanup(&frames, workspace).await;

        match &result {
            Ok(path) => tracing::info!(output = %path.display(), audio_secs, "video assembled"),
            Err(e) => tracing::error!(error = %e, "video assembly failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use image::{Rgb, RgbImage};

    /// Encoder fake that writes a marker file and records nothing else.
    struct WritingEncoder;

    #[async_trait]
    impl Encoder for WritingEncoder {
        async fn encode(&self, job: EncodeJob<'_>) -> Result<PathBuf, PipelineError> {
            // n images -> n entries plus the duplicated final one
            assert_eq!(job.entries.last().unwrap().duration, None);
            tokio::fs::write(job.output, b"video").await?;
            Ok(job.output.to_path_buf())
        }
    }

    /// Encoder fake that always fails like a non-zero ffmpeg exit.
    struct FailingEncoder;

    #[async_trait]
    impl Encoder for FailingEncoder {
        async fn encode(&self, _job: EncodeJob<'_>) -> Result<PathBuf, PipelineError> {
            Err(PipelineError::Encode {
                exit_code: Some(1),
                stderr: "boom".into(),
            })
        }
    }

    async fn workspace_with_images(n: usize) -> (tempfile::TempDir, RunWorkspace, Vec<PathBuf>) {
        let base = tempfile::tempdir().unwrap();
        let ws = RunWorkspace::create_in(base.path()).await.unwrap();
        let mut images = Vec::new();
        for i in 0..n {
            let path = ws.images_dir().join(format!("image_{i}.png"));
            RgbImage::from_pixel(100, 50, Rgb([200, 10, 10]))
                .save(&path)
                .unwrap();
            images.push(path);
        }
        (base, ws, images)
    }

    #[test]
    fn validate_drops_missing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("a.png");
        std::fs::write(&existing, b"x").unwrap();
        let missing = dir.path().join("b.png");

        let valid = validate_paths(&[existing.clone(), missing]);
        assert_eq!(valid, vec![existing]);
    }

    #[tokio::test]
    async fn empty_input_fails_without_creating_output() {
        let base = tempfile::tempdir().unwrap();
        let ws = RunWorkspace::create_in(base.path()).await.unwrap();
        let assembler = VideoAssembler::new(Box::new(WritingEncoder), (64, 64));

        let err = assembler
            .assemble(&[], Path::new("/tmp/whatever.mp3"), &ws)
            .await
            .unwrap_err();

        assert_matches!(err, PipelineError::Input(_));
        let mut entries = tokio::fs::read_dir(ws.videos_dir()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn frames_are_cleaned_up_after_successful_encode() {
        let (_base, ws, images) = workspace_with_images(2).await;
        let assembler = VideoAssembler::new(Box::new(WritingEncoder), (64, 64));

        let frames = assembler.normalize_all(&images, &ws).await.unwrap();
        assert_eq!(frames.len(), 2);
        let result = assembler
            .encode_frames(&frames, 4.0, Path::new("/tmp/speech.mp3"), &ws)
            .await;
        assembler.cleanup(&frames, &ws).await;

        let output = result.unwrap();
        assert!(output.exists());
        for frame in &frames {
            assert!(!frame.exists());
        }
    }

    #[tokio::test]
    async fn frames_are_cleaned_up_after_failed_encode() {
        let (_base, ws, images) = workspace_with_images(2).await;
        let assembler = VideoAssembler::new(Box::new(FailingEncoder), (64, 64));

        let frames = assembler.normalize_all(&images, &ws).await.unwrap();
        let result = assembler
            .encode_frames(&frames, 4.0, Path::new("/tmp/speech.mp3"), &ws)
            .await;
        assembler.cleanup(&frames, &ws).await;

        assert_matches!(result.unwrap_err(), PipelineError::Encode { .. });
        for frame in &frames {
            assert!(!frame.exists());
        }
    }

    #[tokio::test]
    async fn broken_images_are_dropped_individually() {
        let (_base, ws, mut images) = workspace_with_images(1).await;
        let broken = ws.images_dir().join("image_1.png");
        tokio::fs::write(&broken, b"not a png").await.unwrap();
        images.push(broken);

        let assembler = VideoAssembler::new(Box::new(WritingEncoder), (64, 64));
        let frames = assembler.normalize_all(&images, &ws).await.unwrap();
        assert_eq!(frames.len(), 1);
    }

    #[tokio::test]
    async fn all_broken_images_is_input_error() {
        let base = tempfile::tempdir().unwrap();
        let ws = RunWorkspace::create_in(base.path()).await.unwrap();
        let broken = ws.images_dir().join("image_0.png");
        tokio::fs::write(&broken, b"not a png").await.unwrap();

        let assembler = VideoAssembler::new(Box::new(WritingEncoder), (64, 64));
        let err = assembler.normalize_all(&[broken], &ws).await.unwrap_err();
        assert_matches!(err, PipelineError::Input(_));
    }

    #[tokio::test]
    async fn cleanup_removes_the_concat_file_the_encoder_wrote() {
        let (_base, ws, images) = workspace_with_images(2).await;
        let assembler = VideoAssembler::new(Box::new(WritingEncoder), (64, 64));

        let frames = assembler.normalize_all(&images, &ws).await.unwrap();
        let entries = crate::playlist::build_playlist(&frames, 4.0).unwrap();
        let concat = crate::playlist::write_concat_file(&entries, &ws.scratch_dir())
            .await
            .unwrap();
        assert!(concat.exists());

        assembler.cleanup(&frames, &ws).await;
        assert!(!concat.exists());
    }
}
