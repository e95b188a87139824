//! Queue-message body parsing.

use serde::Deserialize;

/// Why a message body could not yield a topic. Each case maps to a
/// distinct error outcome; neither crashes the batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    #[error("Invalid JSON in queue message")]
    InvalidJson,
    #[error("Missing topic in queue message")]
    MissingTopic,
}

#[derive(Debug, Deserialize)]
struct TopicMessage {
    topic: Option<String>,
}

/// Extract the topic from a queue message body of the form
/// `{"topic": "..."}`.
pub fn parse_topic(body: &str) -> Result<String, MessageError> {
    let message: TopicMessage =
        serde_json::from_str(body).map_err(|_| MessageError::InvalidJson)?;
    match message.topic {
        Some(topic) if !topic.trim().is_empty() => Ok(topic),
        _ => Err(MessageError::MissingTopic),
    }
}
