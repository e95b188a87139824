//! Video metadata records in DynamoDB.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;

use clipcast_core::config::Config;
use clipcast_core::error::PipelineError;
use clipcast_core::traits::RecordStore;
use clipcast_core::types::VideoRecord;

/// DynamoDB-backed record store. Disabled when AWS credentials were
/// absent at construction.
pub struct MetadataRecorder {
    client: Option<aws_sdk_dynamodb::Client>,
    table: String,
}

impl MetadataRecorder {
    pub fn new(config: &Config, sdk_config: &aws_config::SdkConfig) -> Self {
        let client = config
            .aws_credentials
            .then(|| aws_sdk_dynamodb::Client::new(sdk_config));
        Self {
            client,
            table: config.video_table.clone(),
        }
    }
}

#[async_trait]
impl RecordStore for MetadataRecorder {
    async fn record(&self, title: &str, url: &str) -> Result<VideoRecord, PipelineError> {
        let client = self.client.as_ref().ok_or_else(|| {
            PipelineError::Config("AWS credentials are not set; metadata records disabled".into())
        })?;

        let record = VideoRecord {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            url: url.to_string(),
            created_at: chrono::Utc::now().timestamp(),
        };

        client
            .put_item()
            .table_name(&self.table)
            .item("id", AttributeValue::S(record.id.clone()))
            .item("title", AttributeValue::S(record.title.clone()))
            .item("url", AttributeValue::S(record.url.clone()))
            .item("created_at", AttributeValue::N(record.created_at.to_string()))
            .send()
            .await
            .map_err(|e| PipelineError::upstream("dynamodb", e))?;

        tracing::info!(id = %record.id, "video record saved");
        Ok(record)
    }
}
