//! Script generation via a DeepSeek-compatible chat completions API.

use async_trait::async_trait;
use serde::Deserialize;

use clipcast_core::config::Config;
use clipcast_core::error::PipelineError;
use clipcast_core::traits::ScriptSource;

/// Default chat completions endpoint base.
const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";

/// Model used for script generation.
const MODEL: &str = "deepseek-chat";

/// System prompt steering the model toward a single narration paragraph.
const SCRIPT_PROMPT: &str = "Generate a short 60 sec engaging paragraph on user query. \
     Just return the paragraph only.";

/// Client for the script-generation service.
pub struct ScriptGenerator {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl ScriptGenerator {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.deepseek_api_key.clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint base.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl ChatResponse {
    /// First non-empty completion, if the service returned one.
    fn script(self) -> Option<String> {
        self.choices
            .into_iter()
            .map(|c| c.message.content)
            .find(|content| !content.trim().is_empty())
    }
}

#[async_trait]
impl ScriptSource for ScriptGenerator {
    async fn generate(&self, topic: &str) -> Result<String, PipelineError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| PipelineError::Config("DEEPSEEK_API_KEY is not set".into()))?;

        let body = serde_json::json!({
            "model": MODEL,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": SCRIPT_PROMPT },
                { "role": "user", "content": topic },
            ],
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::upstream("deepseek", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PipelineError::Upstream {
                service: "deepseek",
                message: format!("HTTP {status}: {body}"),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::upstream("deepseek", e))?;

        parsed.script().ok_or_else(|| PipelineError::Upstream {
            service: "deepseek",
            message: "response contained no completion".into(),
        })
    }
}
