//! Preset preview thumbnails.

use image::imageops::FilterType;
use image::RgbaImage;
use std::path::Path;
use tracing::debug;

use crate::error::RenderResult;

/// Scale that fits a `width` x `height` image inside `max_width` x
/// `max_height` without distortion.
pub fn fit_scale(width: u32, height: u32, max_width: u32, max_height: u32) -> f64 {
    if width == 0 || height == 0 {
        return 1.0;
    }
    let sx = max_width as f64 / width as f64;
    let sy = max_height as f64 / height as f64;
    sx.min(sy)
}

/// Target size after [`fit_scale`], at least one pixel each way.
pub fn fit_size(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let scale = fit_scale(width, height, max_width, max_height);
    (
        ((width as f64 * scale).round() as u32).max(1),
        ((height as f64 * scale).round() as u32).max(1),
    )
}

/// Resize an image to fit the preview box, preserving aspect ratio.
pub fn rescale(image: &RgbaImage, max_width: u32, max_height: u32) -> RgbaImage {
    let (w, h) = fit_size(image.width(), image.height(), max_width, max_height);
    image::imageops::resize(image, w, h, FilterType::Lanczos3)
}

/// Load a preview image from disk and fit it into the preview box.
pub fn load_preview(path: &Path, max_width: u32, max_height: u32) -> RenderResult<RgbaImage> {
    let image = image::open(path)?.to_rgba8();
    let scaled = rescale(&image, max_width, max_height);
    debug!(
        path = %path.display(),
        from = ?image.dimensions(),
        to = ?scaled.dimensions(),
        "Loaded preview"
    );
    Ok(scaled)
}
