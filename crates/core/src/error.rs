//! Shared error taxonomy for all pipeline stages.

/// Error type shared by every pipeline stage.
///
/// Per-item download failures are deliberately NOT part of this enum:
/// they are isolated to their batch slot and carried by
/// [`crate::types::DownloadError`] instead.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A required credential or setting is missing. Fails fast on first
    /// use of the disabled component; never retried.
    #[error("missing configuration: {0}")]
    Config(String),

    /// A remote service rejected the request or was unreachable.
    #[error("upstream error from {service}: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    /// A local file a stage expected does not exist.
    #[error("file not found: {0}")]
    NotFound(String),

    /// No usable input remained after filtering.
    #[error("no usable input: {0}")]
    Input(String),

    /// A required external executable (ffmpeg/ffprobe) is missing or broken.
    #[error("external dependency unavailable: {0}")]
    Dependency(String),

    /// The external encoder exited non-zero.
    #[error("encoder failed (exit code {exit_code:?}): {stderr}")]
    Encode {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Local filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Build an [`PipelineError::Upstream`] from any displayable error.
    pub fn upstream(service: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Upstream {
            service,
            message: err.to_string(),
        }
    }
}
