//! Value types shared across pipeline stages.

use serde::Serialize;

/// A remote image reference returned by the search service. Exists only
/// during the fetch stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    /// URL of the full-size image.
    pub url: String,
    /// Title from the search result, when present.
    pub title: Option<String>,
}

/// The durable record describing a produced video, the only entity that
/// outlives a single run.
#[derive(Debug, Clone, Serialize)]
pub struct VideoRecord {
    /// Opaque unique identifier.
    pub id: String,
    /// The original topic, used as the title.
    pub title: String,
    /// Public address of the stored video.
    pub url: String,
    /// Creation time, epoch seconds.
    pub created_at: i64,
}

/// A single failed image download. Isolated to its batch slot; never
/// fatal to sibling downloads.
#[derive(Debug, Clone, thiserror::Error)]
#[error("download of {url} (candidate {index}) failed: {reason}")]
pub struct DownloadError {
    /// Position of the candidate in the input list.
    pub index: usize,
    /// The URL that failed.
    pub url: String,
    /// Transport error or HTTP status description.
    pub reason: String,
}
