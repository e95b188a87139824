//! Image normalization into the output frame.
//!
//! Every source image is scaled to fit entirely within the target frame
//! (never cropped) and centered on a solid white canvas of exactly the
//! target dimensions.

use std::path::Path;

use image::imageops::FilterType;
use image::{Rgb, RgbImage};

use clipcast_core::error::PipelineError;
use clipcast_core::timing::{centered_offsets, fit_within};

/// Canvas color behind letterboxed images.
const CANVAS_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Normalize `src` into a `frame`-sized image written to `dest`.
///
/// Fails with `Input` when the source cannot be decoded; the caller
/// decides whether that is fatal for the batch.
pub fn normalize_to_frame(
    src: &Path,
    dest: &Path,
    frame: (u32, u32),
) -> Result<(), PipelineError> {
    let img = image::open(src)
        .map_err(|e| PipelineError::Input(format!("cannot decode {}: {e}", src.display())))?
        .to_rgb8();

    let (w, h) = fit_within(img.dimensions(), frame);
    let scaled = image::imageops::resize(&img, w, h, FilterType::Lanczos3);

    let mut canvas = RgbImage::from_pixel(frame.0, frame.1, CANVAS_COLOR);
    let (x, y) = centered_offsets((w, h), frame);
    image::imageops::overlay(&mut canvas, &scaled, x, y);

    canvas
        .save(dest)
        .map_err(|e| PipelineError::Input(format!("cannot write {}: {e}", dest.display())))?;
    Ok(())
}
