//! The drawing surface and its axes.

use image::{GrayImage, Rgba, RgbaImage};
use std::path::Path;

use crate::colormap::Color;
use crate::error::RenderResult;
use crate::png::encode_png;

/// A pixel rectangle on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axes {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Axes {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }

    /// Split off a narrow axes on the right: `size_frac` of this axes'
    /// width, separated by `pad` pixels. Returns (main, appended).
    pub fn append_axes_right(&self, size_frac: f64, pad: u32) -> (Axes, Axes) {
        let bar_width = ((self.width as f64 * size_frac).round() as u32).max(1);
        let main_width = self.width.saturating_sub(bar_width + pad).max(1);
        let main = Axes::new(self.left, self.top, main_width, self.height);
        let bar = Axes::new(self.left + main_width + pad, self.top, bar_width, self.height);
        (main, bar)
    }
}

/// An RGBA drawing surface owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), background.to_rgba()),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The whole canvas minus a margin on every side.
    pub fn axes(&self, margin: u32) -> Axes {
        let width = self.width().saturating_sub(2 * margin).max(1);
        let height = self.height().saturating_sub(2 * margin).max(1);
        Axes::new(margin.min(self.width() - 1), margin.min(self.height() - 1), width, height)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn clear(&mut self, color: Color) {
        let rgba = color.to_rgba();
        for pixel in self.image.pixels_mut() {
            *pixel = rgba;
        }
    }

    /// Alpha-composite `layer` with its top-left corner at (`left`, `top`),
    /// keeping only pixels where `mask` is non-zero.
    pub fn composite(&mut self, layer: &RgbaImage, mask: Option<&GrayImage>, left: u32, top: u32) {
        let (cw, ch) = self.image.dimensions();
        for (x, y, src) in layer.enumerate_pixels() {
            if src[3] == 0 {
                continue;
            }
            if let Some(mask) = mask {
                if mask.get_pixel_checked(x, y).map_or(true, |m| m[0] == 0) {
                    continue;
                }
            }
            let (cx, cy) = (left + x, top + y);
            if cx >= cw || cy >= ch {
                continue;
            }
            let dst = self.image.get_pixel_mut(cx, cy);
            *dst = blend(*dst, *src);
        }
    }

    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        encode_png(&self.image)
    }

    pub fn save_png(&self, path: &Path) -> RenderResult<()> {
        std::fs::write(path, self.encode_png()?)?;
        Ok(())
    }
}

/// Source-over alpha blending.
fn blend(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    if src[3] == 255 {
        return src;
    }
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |s: u8, d: u8| {
        ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a).round() as u8
    };
    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}
