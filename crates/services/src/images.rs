//! Image search (SerpAPI Google Images engine) and concurrent download.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;

use clipcast_core::config::Config;
use clipcast_core::error::PipelineError;
use clipcast_core::traits::ImageSource;
use clipcast_core::types::{DownloadError, ImageCandidate};

/// Default search endpoint base.
const DEFAULT_BASE_URL: &str = "https://serpapi.com";

/// Client for image search and retrieval.
pub struct ImageFetcher {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl ImageFetcher {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.serpapi_api_key.clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint base.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Download one candidate into `dest_dir/image_<index>.jpg`.
    async fn download_one(
        &self,
        index: usize,
        candidate: &ImageCandidate,
        dest_dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let fail = |reason: String| DownloadError {
            index,
            url: candidate.url.clone(),
            reason,
        };

        let response = self
            .client
            .get(&candidate.url)
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fail(format!("HTTP status {status}")));
        }

        let bytes = response.bytes().await.map_err(|e| fail(e.to_string()))?;
        let path = dest_dir.join(format!("image_{index}.jpg"));
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| fail(e.to_string()))?;
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    images_results: Vec<RawImageResult>,
}

#[derive(Debug, Deserialize)]
struct RawImageResult {
    original: Option<String>,
    title: Option<String>,
}

/// Convert a raw search response into candidates, dropping entries with
/// no full-size URL and truncating to `limit`.
fn candidates_from(response: SearchResponse, limit: usize) -> Vec<ImageCandidate> {
    response
        .images_results
        .into_iter()
        .filter_map(|r| {
            r.original.map(|url| ImageCandidate {
                url,
                title: r.title,
            })
        })
        .take(limit)
        .collect()
}

#[async_trait]
impl ImageSource for ImageFetcher {
    async fn search(
        &self,
        topic: &str,
        limit: usize,
    ) -> Result<Vec<ImageCandidate>, PipelineError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| PipelineError::Config("SERPAPI_API_KEY is not set".into()))?;

        let response = self
            .client
            .get(format!("{}/search.json", self.base_url))
            .query(&[
                ("engine", "google_images"),
                ("q", topic),
                ("num", &limit.to_string()),
                ("api_key", api_key),
            ])
            .send()
            .await
            .map_err(|e| PipelineError::upstream("serpapi", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PipelineError::Upstream {
                service: "serpapi",
                message: format!("HTTP {status}: {body}"),
            });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::upstream("serpapi", e))?;

        // Zero results is a valid "no content" outcome, not an error.
        Ok(candidates_from(parsed, limit))
    }

    async fn fetch_all(
        &self,
        candidates: &[ImageCandidate],
        dest_dir: &Path,
    ) -> Vec<Result<PathBuf, DownloadError>> {
        let downloads = candidates
            .iter()
            .enumerate()
            .map(|(i, candidate)| self.download_one(i, candidate, dest_dir));
        join_all(downloads).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn search_json(json: &str) -> SearchResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn candidates_keep_url_and_title() {
        let resp = search_json(
            r#"{"images_results": [
                {"original": "https://a.example/1.jpg", "title": "one"},
                {"original": "https://a.example/2.jpg"}
            ]}"#,
        );
        let candidates = candidates_from(resp, 12);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].url, "https://a.example/1.jpg");
        assert_eq!(candidates[0].title.as_deref(), Some("one"));
        assert_eq!(candidates[1].title, None);
    }

    #[test]
    fn results_without_original_url_are_dropped() {
        let resp = search_json(
            r#"{"images_results": [
                {"title": "thumbnail only"},
                {"original": "https://a.example/2.jpg"}
            ]}"#,
        );
        let candidates = candidates_from(resp, 12);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].url, "https://a.example/2.jpg");
    }

    #[test]
    fn candidates_truncated_to_limit() {
        let results: Vec<String> = (0..20)
            .map(|i| format!(r#"{{"original": "https://a.example/{i}.jpg"}}"#))
            .collect();
        let resp = search_json(&format!(r#"{{"images_results": [{}]}}"#, results.join(",")));
        assert_eq!(candidates_from(resp, 12).len(), 12);
    }

    #[test]
    fn missing_results_field_is_empty_not_error() {
        let resp = search_json(r#"{"search_metadata": {"status": "Success"}}"#);
        assert!(candidates_from(resp, 12).is_empty());
    }

    #[tokio::test]
    async fn missing_api_key_is_config_error() {
        let fetcher = ImageFetcher::new(&Config::default());
        let err = fetcher.search("test", 12).await.unwrap_err();
        assert_matches!(err, PipelineError::Config(_));
    }

    #[tokio::test]
    async fn failed_downloads_occupy_their_slots() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = ImageFetcher::new(&Config::default());
        // Unroutable URLs: every slot fails, but every slot is present
        // and positionally matched to its candidate.
        let candidates: Vec<ImageCandidate> = (0..3)
            .map(|i| ImageCandidate {
                url: format!("http://127.0.0.1:1/image_{i}.jpg"),
                title: None,
            })
            .collect();

        let results = fetcher.fetch_all(&candidates, dir.path()).await;
        assert_eq!(results.len(), 3);
        for (i, result) in results.iter().enumerate() {
            let err = result.as_ref().unwrap_err();
            assert_eq!(err.index, i);
            assert_eq!(err.url, candidates[i].url);
        }
    }
}
