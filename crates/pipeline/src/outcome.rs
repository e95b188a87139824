//! The structured result of one pipeline run.

use serde::Serialize;

/// Exactly one of these is produced per run; no exception escapes the
/// orchestrator's entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Video stored and metadata recorded.
    Success {
        video_url: String,
        video_id: String,
    },
    /// Video stored, but the metadata record failed. The durable artifact
    /// exists, so this is not an error.
    PartialSuccess {
        video_url: String,
        message: String,
    },
    /// The run failed before a video was stored.
    Error { message: String },
}

impl Outcome {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
