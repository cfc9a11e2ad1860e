//! Placing a projected map extent inside an axes.

use image::{GrayImage, Luma, RgbaImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use projection::Boundary;
use viewer_common::BoundingBox;

use crate::canvas::Axes;

/// A projected extent fitted into an axes with its aspect ratio preserved,
/// centred on the spare dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    extent: BoundingBox,
    left: u32,
    top: u32,
    width: u32,
    height: u32,
}

impl MapView {
    pub fn fit(extent: BoundingBox, axes: &Axes) -> Self {
        let aspect = extent.aspect_ratio();
        let axes_aspect = axes.width as f64 / axes.height.max(1) as f64;
        let (width, height) = if aspect >= axes_aspect {
            (axes.width, ((axes.width as f64 / aspect).round() as u32).max(1))
        } else {
            (((axes.height as f64 * aspect).round() as u32).max(1), axes.height)
        };
        let left = axes.left + axes.width.saturating_sub(width) / 2;
        let top = axes.top + axes.height.saturating_sub(height) / 2;
        Self {
            extent,
            left,
            top,
            width,
            height,
        }
    }

    pub fn extent(&self) -> BoundingBox {
        self.extent
    }

    /// Top-left corner on the canvas.
    pub fn origin(&self) -> (u32, u32) {
        (self.left, self.top)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Projected coordinates to view-local pixel coordinates.
    pub fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let w = self.extent.width();
        let h = self.extent.height();
        let sx = if w > 0.0 { self.width as f64 / w } else { 1.0 };
        let sy = if h > 0.0 { self.height as f64 / h } else { 1.0 };
        ((x - self.extent.min_x) * sx, (self.extent.max_y - y) * sy)
    }

    /// A transparent image covering the view.
    pub fn new_layer(&self) -> RgbaImage {
        RgbaImage::new(self.width, self.height)
    }

    /// Mask of the pixels inside the map boundary.
    pub fn boundary_mask(&self, boundary: &Boundary) -> GrayImage {
        let mut mask = GrayImage::new(self.width, self.height);
        let points = self.boundary_points(boundary);
        if points.len() >= 3 {
            draw_polygon_mut(&mut mask, &points, Luma([255u8]));
        }
        mask
    }

    /// Boundary outline in view-local pixels, consecutive duplicates removed
    /// and the polygon left open.
    pub fn boundary_points(&self, boundary: &Boundary) -> Vec<Point<i32>> {
        let mut points: Vec<Point<i32>> = Vec::new();
        for (x, y) in boundary.polygon(360) {
            let (px, py) = self.to_pixel(x, y);
            // keep the outline on the last pixel row/column
            let p = Point::new(
                (px.round() as i32).clamp(0, self.width as i32 - 1),
                (py.round() as i32).clamp(0, self.height as i32 - 1),
            );
            if points.last() != Some(&p) {
                points.push(p);
            }
        }
        while points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        points
    }
}
