//! Capability traits for the pipeline stages.
//!
//! The orchestrator sequences stages through these traits so each
//! external-service client and the encoder mechanism stay swappable
//! (and mockable in tests) without touching the sequencing logic.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::PipelineError;
use crate::types::{DownloadError, ImageCandidate, VideoRecord};
use crate::workspace::RunWorkspace;

/// Generates a narration script for a topic.
#[async_trait]
pub trait ScriptSource: Send + Sync {
    /// One-shot text generation. Consumes one unit of API quota; no retry.
    async fn generate(&self, topic: &str) -> Result<String, PipelineError>;
}

/// Finds and downloads topic images.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Query the search service, truncated to `limit` results. Zero
    /// results is an empty vec, not an error.
    async fn search(
        &self,
        topic: &str,
        limit: usize,
    ) -> Result<Vec<ImageCandidate>, PipelineError>;

    /// Download every candidate concurrently into `dest_dir`. One result
    /// slot per candidate, in input order; a slot's failure never cancels
    /// its siblings.
    async fn fetch_all(
        &self,
        candidates: &[ImageCandidate],
        dest_dir: &Path,
    ) -> Vec<Result<PathBuf, DownloadError>>;
}

/// Synthesizes narration audio.
#[async_trait]
pub trait SpeechSource: Send + Sync {
    /// Enumerate available voice identifiers for a language tag.
    async fn list_voices(&self, language: &str) -> Result<Vec<String>, PipelineError>;

    /// Synthesize `text` with `voice_id` into an audio file under
    /// `dest_dir`.
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, PipelineError>;
}

/// Composites images and audio into a single video file.
#[async_trait]
pub trait Assembler: Send + Sync {
    /// Produce a video whose duration matches the audio, using the run
    /// workspace for intermediate artifacts.
    async fn assemble(
        &self,
        images: &[PathBuf],
        audio: &Path,
        workspace: &RunWorkspace,
    ) -> Result<PathBuf, PipelineError>;
}

/// Uploads a finished video to durable object storage.
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Upload `local` under `key` and return its public address.
    async fn upload(&self, local: &Path, key: &str) -> Result<String, PipelineError>;
}

/// Persists the metadata record for a stored video.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist `{id, title, url, created_at}` with a fresh id and
    /// timestamp.
    async fn record(&self, title: &str, url: &str) -> Result<VideoRecord, PipelineError>;
}
