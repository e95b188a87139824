//! Topic queue consumption via Amazon SQS.

use clipcast_core::config::Config;
use clipcast_core::error::PipelineError;

/// Long-poll wait per receive call, seconds.
const WAIT_TIME_SECONDS: i32 = 10;

/// Messages fetched per receive call.
const MAX_MESSAGES: i32 = 10;

/// A received queue message: the raw JSON body plus the handle needed to
/// delete it after processing.
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub body: String,
    pub receipt_handle: String,
}

/// SQS consumer for topic messages. Disabled when AWS credentials were
/// absent at construction.
pub struct TopicQueue {
    client: Option<aws_sdk_sqs::Client>,
    queue_name: String,
}

impl TopicQueue {
    pub fn new(config: &Config, sdk_config: &aws_config::SdkConfig) -> Self {
        let client = config
            .aws_credentials
            .then(|| aws_sdk_sqs::Client::new(sdk_config));
        Self {
            client,
            queue_name: config.queue_name.clone(),
        }
    }

    fn client(&self) -> Result<&aws_sdk_sqs::Client, PipelineError> {
        self.client.as_ref().ok_or_else(|| {
            PipelineError::Config("AWS credentials are not set; queue consumption disabled".into())
        })
    }

    /// Resolve the queue URL from its configured name.
    pub async fn queue_url(&self) -> Result<String, PipelineError> {
        let response = self
            .client()?
            .get_queue_url()
            .queue_name(&self.queue_name)
            .send()
            .await
            .map_err(|e| PipelineError::upstream("sqs", e))?;

        response
            .queue_url()
            .map(str::to_string)
            .ok_or_else(|| PipelineError::Upstream {
                service: "sqs",
                message: format!("no URL returned for queue '{}'", self.queue_name),
            })
    }

    /// Long-poll for a batch of messages. Messages missing a body or
    /// receipt handle are skipped.
    pub async fn receive(&self, queue_url: &str) -> Result<Vec<QueueMessage>, PipelineError> {
        let response = self
            .client()?
            .receive_message()
            .queue_url(queue_url)
            .wait_time_seconds(WAIT_TIME_SECONDS)
            .max_number_of_messages(MAX_MESSAGES)
            .send()
            .await
            .map_err(|e| PipelineError::upstream("sqs", e))?;

        Ok(response
            .messages()
            .iter()
            .filter_map(|m| {
                Some(QueueMessage {
                    body: m.body()?.to_string(),
                    receipt_handle: m.receipt_handle()?.to_string(),
                })
            })
            .collect())
    }

    /// Delete a processed message so it is not redelivered.
    pub async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<(), PipelineError> {
        self.client()?
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| PipelineError::upstream("sqs", e))?;
        Ok(())
    }
}
