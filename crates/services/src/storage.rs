//! Object storage upload via Amazon S3.

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

use clipcast_core::config::Config;
use clipcast_core::error::PipelineError;
use clipcast_core::traits::VideoStore;

/// S3-backed video store. Disabled when AWS credentials or the bucket
/// name were absent at construction.
pub struct StorageUploader {
    client: Option<aws_sdk_s3::Client>,
    bucket: Option<String>,
}

impl StorageUploader {
    pub fn new(config: &Config, sdk_config: &aws_config::SdkConfig) -> Self {
        let client = config
            .aws_credentials
            .then(|| aws_sdk_s3::Client::new(sdk_config));
        Self {
            client,
            bucket: config.bucket_name.clone(),
        }
    }
}

#[async_trait]
impl VideoStore for StorageUploader {
    async fn upload(&self, local: &Path, key: &str) -> Result<String, PipelineError> {
        let client = self.client.as_ref().ok_or_else(|| {
            PipelineError::Config("AWS credentials are not set; upload disabled".into())
        })?;
        let bucket = self
            .bucket
            .as_deref()
            .ok_or_else(|| PipelineError::Config("BUCKET_NAME is not set".into()))?;

        if !local.exists() {
            return Err(PipelineError::NotFound(local.display().to_string()));
        }

        let body = ByteStream::from_path(local)
            .await
            .map_err(|e| PipelineError::Io(std::io::Error::other(e)))?;

        client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| PipelineError::upstream("s3", e))?;

        // Address is deterministic from the bucket and key.
        let url = format!("https://{bucket}.s3.amazonaws.com/{key}");
        tracing::info!(%url, "video uploaded");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn sdk_config() -> aws_config::SdkConfig {
        aws_config::SdkConfig::builder()
            .behavior_version(aws_config::BehaviorVersion::latest())
            .build()
    }

    #[tokio::test]
    async fn disabled_upload_is_config_error() {
        let uploader = StorageUploader {
            client: None,
            bucket: Some("bucket".into()),
        };
        let err = uploader
            .upload(Path::new("/tmp/video.mp4"), "videos/video.mp4")
            .await
            .unwrap_err();
        assert_matches!(err, PipelineError::Config(_));
    }

    #[tokio::test]
    async fn missing_bucket_is_config_error() {
        let uploader = StorageUploader {
            client: Some(aws_sdk_s3::Client::new(&sdk_config())),
            bucket: None,
        };
        let err = uploader
            .upload(Path::new("/tmp/video.mp4"), "videos/video.mp4")
            .await
            .unwrap_err();
        assert_matches!(err, PipelineError::Config(_));
    }

    #[tokio::test]
    async fn missing_local_file_is_not_found() {
        let uploader = StorageUploader {
            client: Some(aws_sdk_s3::Client::new(&sdk_config())),
            bucket: Some("bucket".into()),
        };
        let err = uploader
            .upload(Path::new("/definitely/not/here.mp4"), "videos/here.mp4")
            .await
            .unwrap_err();
        assert_matches!(err, PipelineError::NotFound(_));
    }
}
