//! Environment-resolved pipeline configuration.
//!
//! All settings are read once at startup. Credentials have no defaults:
//! a missing credential disables the owning component, which then fails
//! with [`PipelineError::Config`](crate::error::PipelineError::Config) on
//! first use instead of at startup.

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default AWS region.
pub const DEFAULT_REGION: &str = "ap-south-1";

/// Default DynamoDB table for video metadata records.
pub const DEFAULT_VIDEO_TABLE: &str = "ai_videos";

/// Default SQS queue name for topic messages.
pub const DEFAULT_QUEUE_NAME: &str = "video-generation-queue";

/// Default number of image-search results requested per topic.
pub const DEFAULT_SEARCH_LIMIT: usize = 12;

/// Default output frame size (16:9).
pub const DEFAULT_FRAME_WIDTH: u32 = 1280;
pub const DEFAULT_FRAME_HEIGHT: u32 = 720;

/// Default output frame rate.
pub const DEFAULT_FPS: u32 = 24;

/// Voice language used when listing synthesis voices.
pub const DEFAULT_VOICE_LANGUAGE: &str = "en-US";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Resolved pipeline configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the script-generation service. `None` disables it.
    pub deepseek_api_key: Option<String>,
    /// API key for the image-search service. `None` disables it.
    pub serpapi_api_key: Option<String>,
    /// Whether AWS credentials are present. Gates Polly, S3, DynamoDB
    /// and SQS construction.
    pub aws_credentials: bool,
    /// AWS region for all SDK clients.
    pub region: String,
    /// S3 bucket receiving finished videos. `None` disables upload.
    pub bucket_name: Option<String>,
    /// DynamoDB table for video metadata records.
    pub video_table: String,
    /// SQS queue name polled by the worker.
    pub queue_name: String,
    /// Maximum image-search results per topic.
    pub search_limit: usize,
    /// Output frame dimensions.
    pub frame_width: u32,
    pub frame_height: u32,
    /// Output frame rate.
    pub fps: u32,
    /// Language tag for voice listing.
    pub voice_language: String,
}

impl Config {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            deepseek_api_key: non_empty_var("DEEPSEEK_API_KEY"),
            serpapi_api_key: non_empty_var("SERPAPI_API_KEY"),
            aws_credentials: non_empty_var("AWS_ACCESS_KEY_ID").is_some()
                && non_empty_var("AWS_SECRET_ACCESS_KEY").is_some(),
            region: non_empty_var("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            bucket_name: non_empty_var("BUCKET_NAME"),
            video_table: non_empty_var("VIDEO_TABLE_NAME")
                .unwrap_or_else(|| DEFAULT_VIDEO_TABLE.to_string()),
            queue_name: non_empty_var("QUEUE_NAME")
                .unwrap_or_else(|| DEFAULT_QUEUE_NAME.to_string()),
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deepseek_api_key: None,
            serpapi_api_key: None,
            aws_credentials: false,
            region: DEFAULT_REGION.to_string(),
            bucket_name: None,
            video_table: DEFAULT_VIDEO_TABLE.to_string(),
            queue_name: DEFAULT_QUEUE_NAME.to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
            fps: DEFAULT_FPS,
            voice_language: DEFAULT_VOICE_LANGUAGE.to_string(),
        }
    }
}

/// Read an env var, treating unset and empty/whitespace-only as absent.
fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
