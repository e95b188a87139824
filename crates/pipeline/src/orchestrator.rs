//! The pipeline orchestrator: sequences the stages for one topic and
//! maps every stage failure to a structured outcome.
//!
//! Stage order: GenerateScript → FetchImages → SynthesizeSpeech →
//! AssembleVideo → Upload → RecordMetadata, with cleanup of the run's
//! temp tree on every path. A metadata-record failure is downgraded to
//! partial success because the durable artifact already exists.

use std::path::{Path, PathBuf};

use rand::seq::IndexedRandom;

use clipcast_core::config::Config;
use clipcast_core::error::PipelineError;
use clipcast_core::traits::{
    Assembler, ImageSource, RecordStore, ScriptSource, SpeechSource, VideoStore,
};
use clipcast_core::workspace::RunWorkspace;

use crate::outcome::Outcome;

/// Sequences one pipeline run per topic. Each instance owns no mutable
/// state, so independent runs may execute concurrently; isolation comes
/// from per-run workspaces.
pub struct Orchestrator {
    script: Box<dyn ScriptSource>,
    images: Box<dyn ImageSource>,
    speech: Box<dyn SpeechSource>,
    assembler: Box<dyn Assembler>,
    store: Box<dyn VideoStore>,
    records: Box<dyn RecordStore>,
    config: Config,
}

impl Orchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        script: Box<dyn ScriptSource>,
        images: Box<dyn ImageSource>,
        speech: Box<dyn SpeechSource>,
        assembler: Box<dyn Assembler>,
        store: Box<dyn VideoStore>,
        records: Box<dyn RecordStore>,
        config: Config,
    ) -> Self {
        Self {
            script,
            images,
            speech,
            assembler,
            store,
            records,
            config,
        }
    }

    /// Run the full pipeline for one topic. Never returns an error: every
    /// failure becomes an `error` outcome, and the run's temporary files
    /// are removed on every path.
    pub async fn run(&self, topic: &str) -> Outcome {
        self.run_in(topic, &std::env::temp_dir()).await
    }

    /// Like [`run`](Self::run), with the temp tree rooted under `base`.
    pub async fn run_in(&self, topic: &str, base: &Path) -> Outcome {
        let workspace = match RunWorkspace::create_in(base).await {
            Ok(ws) => ws,
            Err(e) => return Outcome::error(format!("failed to create run workspace: {e}")),
        };

        let outcome = match self.try_stages(topic, &workspace).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(topic, run_id = workspace.run_id(), error = %e, "pipeline run failed");
                Outcome::error(e.to_string())
            }
        };

        workspace.remove().await;
        outcome
    }

    async fn try_stages(
        &self,
        topic: &str,
        workspace: &RunWorkspace,
    ) -> Result<Outcome, PipelineError> {
        let run_id = workspace.run_id();

        tracing::info!(topic, run_id, "generating script");
        let script = self.script.generate(topic).await?;
        tracing::debug!(run_id, script_len = script.len(), "script generated");

        tracing::info!(topic, run_id, "searching for images");
        let candidates = self.images.search(topic, self.config.search_limit).await?;
        if candidates.is_empty() {
            // A distinct "no content" outcome, not an upstream failure.
            return Ok(Outcome::error("No images found"));
        }

        tracing::info!(run_id, count = candidates.len(), "downloading images");
        let results = self
            .images
            .fetch_all(&candidates, &workspace.images_dir())
            .await;
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            tracing::warn!(run_id, %err, "image download failed");
        }
        let images: Vec<PathBuf> = results.into_iter().flatten().collect();
        if images.is_empty() {
            return Ok(Outcome::error("All image downloads failed"));
        }
        tracing::info!(run_id, downloaded = images.len(), "images ready");

        tracing::info!(run_id, "synthesizing speech");
        let voices = self.speech.list_voices(&self.config.voice_language).await?;
        let voice = voices
            .choose(&mut rand::rng())
            .ok_or_else(|| PipelineError::Upstream {
                service: "speech",
                message: format!("no voices available for '{}'", self.config.voice_language),
            })?;
        tracing::debug!(run_id, %voice, "voice selected");
        let audio = self
            .speech
            .synthesize(&script, voice, &workspace.audio_dir())
            .await?;

        tracing::info!(run_id, "assembling video");
        let video = self.assembler.assemble(&images, &audio, workspace).await?;

        let key = format!("videos/{}", basename(&video, run_id));
        tracing::info!(run_id, %key, "uploading video");
        let video_url = self.store.upload(&video, &key).await?;

        match self.records.record(topic, &video_url).await {
            Ok(record) => Ok(Outcome::Success {
                video_url,
                video_id: record.id,
            }),
            Err(e) => {
                // The video is already durable; report a partial success
                // instead of rolling anything back.
                tracing::warn!(run_id, error = %e, "metadata record failed after upload");
                Ok(Outcome::PartialSuccess {
                    video_url,
                    message: format!("metadata record failed: {e}"),
                })
            }
        }
    }
}

/// Final path component of the assembled video, with a run-scoped
/// fallback for degenerate paths.
fn basename(path: &Path, run_id: &str) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("video_{run_id}.mp4"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_takes_final_component() {
        assert_eq!(
            basename(Path::new("/tmp/clipcast/x/videos/video_x.mp4"), "x"),
            "video_x.mp4"
        );
    }

    #[test]
    fn basename_falls_back_to_run_id() {
        assert_eq!(basename(Path::new("/"), "abc"), "video_abc.mp4");
    }
}
