//! FFprobe wrapper for audio duration probing.

use std::path::Path;

use serde::Deserialize;

use clipcast_core::error::PipelineError;

// ---------------------------------------------------------------------------
// ffprobe JSON output structures
// ---------------------------------------------------------------------------

/// Top-level ffprobe JSON output (`-print_format json -show_format -show_streams`).
#[derive(Debug, Deserialize)]
pub struct FfprobeOutput {
    #[serde(default)]
    pub streams: Vec<FfprobeStream>,
    pub format: FfprobeFormat,
}

/// A single stream from ffprobe output.
#[derive(Debug, Deserialize)]
pub struct FfprobeStream {
    pub codec_type: Option<String>,
    pub duration: Option<String>,
}

/// Format-level metadata from ffprobe.
#[derive(Debug, Deserialize)]
pub struct FfprobeFormat {
    pub duration: Option<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Probe a media file's duration in seconds.
///
/// Prefers the format-level duration and falls back to the first stream
/// that carries one. Fails with `Dependency` when the ffprobe binary is
/// missing or exits non-zero, and with `Input` when no positive duration
/// can be determined.
pub async fn probe_duration(path: &Path) -> Result<f64, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::NotFound(path.display().to_string()));
    }

    let output = tokio::process::Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .await
        .map_err(|e| PipelineError::Dependency(format!("ffprobe not available: {e}")))?;

    if !output.status.success() {
        return Err(PipelineError::Dependency(format!(
            "ffprobe exited with {:?}: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let probe: FfprobeOutput = serde_json::from_str(&stdout)
        .map_err(|e| PipelineError::Dependency(format!("unparseable ffprobe output: {e}")))?;

    match parse_duration(&probe) {
        Some(secs) if secs > 0.0 => Ok(secs),
        _ => Err(PipelineError::Input(format!(
            "no positive duration in {}",
            path.display()
        ))),
    }
}

/// Extract a duration in seconds from parsed ffprobe output.
pub fn parse_duration(probe: &FfprobeOutput) -> Option<f64> {
    if let Some(secs) = probe.format.duration.as_deref().and_then(parse_secs) {
        return Some(secs);
    }
    probe
        .streams
        .iter()
        .find_map(|s| s.duration.as_deref().and_then(parse_secs))
}

fn parse_secs(s: &str) -> Option<f64> {
    s.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn probe_json(json: &str) -> FfprobeOutput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn duration_from_format_level() {
        let probe = probe_json(r#"{"streams": [], "format": {"duration": "4.032"}}"#);
        assert!((parse_duration(&probe).unwrap() - 4.032).abs() < 1e-9);
    }

    #[test]
    fn duration_falls_back_to_stream() {
        let probe = probe_json(
            r#"{
                "streams": [
                    {"codec_type": "audio", "duration": "12.5"}
                ],
                "format": {}
            }"#,
        );
        assert!((parse_duration(&probe).unwrap() - 12.5).abs() < 1e-9);
    }

    #[test]
    fn format_duration_wins_over_stream() {
        let probe = probe_json(
            r#"{
                "streams": [{"codec_type": "audio", "duration": "99.0"}],
                "format": {"duration": "10.0"}
            }"#,
        );
        assert!((parse_duration(&probe).unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn missing_durations_yield_none() {
        let probe = probe_json(r#"{"streams": [{"codec_type": "audio"}], "format": {}}"#);
        assert!(parse_duration(&probe).is_none());
    }

    #[test]
    fn unparseable_duration_yields_none() {
        let probe = probe_json(r#"{"streams": [], "format": {"duration": "N/A"}}"#);
        assert!(parse_duration(&probe).is_none());
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let err = probe_duration(Path::new("/nonexistent/audio.mp3"))
            .await
            .unwrap_err();
        assert_matches!(err, PipelineError::NotFound(_));
    }
}
