//! The narrow encoding capability and its ffmpeg CLI implementation.
//!
//! The assembler talks to [`Encoder`] only, so the mechanism (external
//! CLI today, a native library later) is swappable without touching the
//! duration/resize logic.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use clipcast_core::error::PipelineError;

use crate::playlist::{write_concat_file, PlaylistEntry};

// ---------------------------------------------------------------------------
// Output spec
// ---------------------------------------------------------------------------

/// Encoding parameters for the output video.
#[derive(Debug, Clone)]
pub struct OutputSpec {
    /// Output frame rate.
    pub fps: u32,
    /// Video codec passed to the encoder.
    pub video_codec: String,
    /// Pixel format; 4:2:0 chroma subsampling for broad compatibility.
    pub pixel_format: String,
    /// Audio codec.
    pub audio_codec: String,
    /// Audio bitrate.
    pub audio_bitrate: String,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            fps: 24,
            video_codec: "libx264".into(),
            pixel_format: "yuv420p".into(),
            audio_codec: "aac".into(),
            audio_bitrate: "192k".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Encoder capability
// ---------------------------------------------------------------------------

/// One encoding request: ordered playlist entries, the narration audio,
/// scratch space for intermediate files, and the output path.
#[derive(Debug)]
pub struct EncodeJob<'a> {
    pub entries: &'a [PlaylistEntry],
    pub audio: &'a Path,
    pub scratch_dir: &'a Path,
    pub output: &'a Path,
}

/// Turns a playlist plus audio into a single video file.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Encode the job, returning the output path on success.
    async fn encode(&self, job: EncodeJob<'_>) -> Result<PathBuf, PipelineError>;
}

// ---------------------------------------------------------------------------
// ffmpeg implementation
// ---------------------------------------------------------------------------

/// [`Encoder`] backed by the ffmpeg CLI and its concat demuxer.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    spec: OutputSpec,
}

impl FfmpegEncoder {
    pub fn new(spec: OutputSpec) -> Self {
        Self { spec }
    }

    /// Arguments for one invocation. `-shortest` bounds the output by the
    /// shorter of the image track and the audio; with correct duration
    /// math the two are equal.
    fn args(&self, playlist: &Path, audio: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".into(),
            "-f".into(),
            "concat".into(),
            "-safe".into(),
            "0".into(),
            "-i".into(),
            playlist.display().to_string(),
            "-i".into(),
            audio.display().to_string(),
            "-r".into(),
            self.spec.fps.to_string(),
            "-c:v".into(),
            self.spec.video_codec.clone(),
            "-pix_fmt".into(),
            self.spec.pixel_format.clone(),
            "-c:a".into(),
            self.spec.audio_codec.clone(),
            "-b:a".into(),
            self.spec.audio_bitrate.clone(),
            "-shortest".into(),
            output.display().to_string(),
        ]
    }
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    async fn encode(&self, job: EncodeJob<'_>) -> Result<PathBuf, PipelineError> {
        let playlist = write_concat_file(job.entries, job.scratch_dir).await?;

        let output = tokio::process::Command::new("ffmpeg")
            .args(self.args(&playlist, job.audio, job.output))
            .output()
            .await
            .map_err(|e| PipelineError::Dependency(format!("ffmpeg not available: {e}")))?;

        if !output.status.success() {
            return Err(PipelineError::Encode {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(job.output.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spec_targets_broad_compatibility() {
        let spec = OutputSpec::default();
        assert_eq!(spec.video_codec, "libx264");
        assert_eq!(spec.pixel_format, "yuv420p");
        assert_eq!(spec.audio_codec, "aac");
        assert_eq!(spec.fps, 24);
    }

    #[test]
    fn args_use_concat_demuxer_and_stop_at_shorter_stream() {
        let enc = FfmpegEncoder::new(OutputSpec::default());
        let args = enc.args(
            Path::new("/tmp/playlist.txt"),
            Path::new("/tmp/speech.mp3"),
            Path::new("/tmp/out.mp4"),
        );

        let concat_at = args.iter().position(|a| a == "concat").unwrap();
        assert_eq!(args[concat_at - 1], "-f");
        assert!(args.contains(&"-shortest".to_string()));
        assert!(args.contains(&"yuv420p".to_string()));
        assert_eq!(args.last().unwrap(), "/tmp/out.mp4");

        // playlist is the first input, audio the second
        let inputs: Vec<&String> = args
            .iter()
            .zip(args.iter().skip(1))
            .filter(|(flag, _)| *flag == "-i")
            .map(|(_, value)| value)
            .collect();
        assert_eq!(inputs, ["/tmp/playlist.txt", "/tmp/speech.mp3"]);
    }
}
