//! Concat-demuxer playlist construction.
//!
//! The ffmpeg concat demuxer ignores the duration attached to the last
//! entry, so the final image path is listed a second time with no
//! duration field to force it to render for its allotted time. An
//! encoder implementation that sets clip durations directly would skip
//! the duplication instead.

use std::path::{Path, PathBuf};

use clipcast_core::error::PipelineError;
use clipcast_core::timing::per_image_duration;

/// Filename of the concat input file inside a run's scratch directory.
pub const CONCAT_FILE_NAME: &str = "playlist.txt";

/// One playlist line: an image path and an optional display duration.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistEntry {
    pub path: PathBuf,
    pub duration: Option<f64>,
}

/// Build the ordered playlist for `images` covering `audio_secs` of audio.
///
/// Every image gets `audio_secs / images.len()` seconds; the final image
/// is appended once more with no duration (see module docs).
pub fn build_playlist(images: &[PathBuf], audio_secs: f64) -> Result<Vec<PlaylistEntry>, PipelineError> {
    let per_image = per_image_duration(audio_secs, images.len())?;

    let mut entries: Vec<PlaylistEntry> = images
        .iter()
        .map(|path| PlaylistEntry {
            path: path.clone(),
            duration: Some(per_image),
        })
        .collect();

    // images.len() >= 1 here, per_image_duration rejected the empty case.
    if let Some(last) = images.last() {
        entries.push(PlaylistEntry {
            path: last.clone(),
            duration: None,
        });
    }

    Ok(entries)
}

/// Render playlist entries as concat-demuxer input text.
///
/// Format per entry: `file '<path>'` followed by `duration <secs>` when a
/// duration is present. Durations are written as literal decimal values.
pub fn render_concat_file(entries: &[PlaylistEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!("file '{}'\n", entry.path.display()));
        if let Some(secs) = entry.duration {
            out.push_str(&format!("duration {secs}\n"));
        }
    }
    out
}

/// Write the concat file for `entries` into `scratch_dir`, returning its
/// path.
pub async fn write_concat_file(
    entries: &[PlaylistEntry],
    scratch_dir: &Path,
) -> Result<PathBuf, PipelineError> {
    let path = scratch_dir.join(CONCAT_FILE_NAME);
    tokio::fs::write(&path, render_concat_file(entries)).await?;
    Ok(path)
}
