//! Speech synthesis via Amazon Polly.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use aws_sdk_polly::types::{Engine, LanguageCode, OutputFormat, VoiceId};

use clipcast_core::config::Config;
use clipcast_core::error::PipelineError;
use clipcast_core::traits::SpeechSource;

/// Polly-backed speech synthesizer. Disabled (every call returns a
/// `Config` error) when AWS credentials were absent at construction.
pub struct SpeechSynthesizer {
    client: Option<aws_sdk_polly::Client>,
}

impl SpeechSynthesizer {
    pub fn new(config: &Config, sdk_config: &aws_config::SdkConfig) -> Self {
        let client = config
            .aws_credentials
            .then(|| aws_sdk_polly::Client::new(sdk_config));
        Self { client }
    }

    fn client(&self) -> Result<&aws_sdk_polly::Client, PipelineError> {
        self.client.as_ref().ok_or_else(|| {
            PipelineError::Config("AWS credentials are not set; speech synthesis disabled".into())
        })
    }
}

#[async_trait]
impl SpeechSource for SpeechSynthesizer {
    async fn list_voices(&self, language: &str) -> Result<Vec<String>, PipelineError> {
        let response = self
            .client()?
            .describe_voices()
            .language_code(LanguageCode::from(language))
            .send()
            .await
            .map_err(|e| PipelineError::upstream("polly", e))?;

        Ok(response
            .voices()
            .iter()
            .filter_map(|v| v.id().map(|id| id.as_str().to_string()))
            .collect())
    }

    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, PipelineError> {
        let response = self
            .client()?
            .synthesize_speech()
            .engine(Engine::Neural)
            .output_format(OutputFormat::Mp3)
            .voice_id(VoiceId::from(voice_id))
            .text(text)
            .send()
            .await
            .map_err(|e| PipelineError::upstream("polly", e))?;

        let audio = response
            .audio_stream
            .collect()
            .await
            .map_err(|e| PipelineError::upstream("polly", e))?
            .into_bytes();

        let path = dest_dir.join(format!("speech_{}.mp3", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, &audio).await?;
        tracing::debug!(voice_id, bytes = audio.len(), path = %path.display(), "speech synthesized");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn disabled() -> SpeechSynthesizer {
        SpeechSynthesizer { client: None }
    }

    #[tokio::test]
    async fn disabled_list_voices_is_config_error() {
        let err = disabled().list_voices("en-US").await.unwrap_err();
        assert_matches!(err, PipelineError::Config(_));
    }

    #[tokio::test]
    async fn disabled_synthesize_is_config_error() {
        let err = disabled()
            .synthesize("hello", "Joanna", Path::new("/tmp"))
            .await
            .unwrap_err();
        assert_matches!(err, PipelineError::Config(_));
    }
}
