//! Duration and geometry math for video assembly.
//!
//! Pure functions: per-image duration allocation, scale-to-fit sizing,
//! and centering offsets for letterboxed frames.

use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Duration allocation
// ---------------------------------------------------------------------------

/// Split an audio duration evenly across `image_count` images.
///
/// The result is a literal f64 seconds value; no rounding is applied, so
/// `per_image_duration(d, n) * n == d` within floating tolerance.
pub fn per_image_duration(audio_secs: f64, image_count: usize) -> Result<f64, PipelineError> {
    if image_count == 0 {
        return Err(PipelineError::Input(
            "cannot allocate durations across zero images".into(),
        ));
    }
    if !(audio_secs > 0.0) {
        return Err(PipelineError::Input(format!(
            "audio duration must be positive, got {audio_secs}"
        )));
    }
    Ok(audio_secs / image_count as f64)
}

// ---------------------------------------------------------------------------
// Scale-to-fit sizing
// ---------------------------------------------------------------------------

/// Compute the largest size with `src`'s aspect ratio that fits entirely
/// inside `target` (scale-to-fit, never crop).
///
/// Scaled dimensions are truncated to integer pixel counts, so both are
/// `<=` the target in each axis. Returns at least 1x1 for non-degenerate
/// input.
pub fn fit_within(src: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (sw, sh) = (src.0 as f64, src.1 as f64);
    let (tw, th) = (target.0 as f64, target.1 as f64);
    let scale = (tw / sw).min(th / sh);
    let w = (sw * scale) as u32;
    let h = (sh * scale) as u32;
    (w.max(1), h.max(1))
}

/// Offsets that center an `inner` box inside an `outer` box.
///
/// With integer division the left/top margin is within 1px of the
/// right/bottom margin.
pub fn centered_offsets(inner: (u32, u32), outer: (u32, u32)) -> (i64, i64) {
    (
        (i64::from(outer.0) - i64::from(inner.0)) / 2,
        (i64::from(outer.1) - i64::from(inner.1)) / 2,
    )
}
