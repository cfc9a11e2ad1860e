//! Pseudocolor mesh rasterization.

use image::RgbaImage;
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;
use tracing::debug;

use crate::colormap::Colormap;
use crate::norm::Normalization;
use crate::view::MapView;

/// Projected coordinates beyond this magnitude are off the map.
pub const OFF_MAP_THRESHOLD: f64 = 1e20;

// keeps far off-screen vertices inside i32 arithmetic
const PIXEL_LIMIT: f64 = 1e6;

/// A rows x cols grid of projected vertices.
///
/// `valid` marks vertices that carry a real position; invalid vertices
/// (sentinels standing in for unprojectable points) never contribute to a
/// drawn cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedMesh {
    rows: usize,
    cols: usize,
    x: Vec<f64>,
    y: Vec<f64>,
    valid: Vec<bool>,
}

impl ProjectedMesh {
    /// `None` unless all three arrays hold `rows * cols` entries.
    pub fn new(rows: usize, cols: usize, x: Vec<f64>, y: Vec<f64>, valid: Vec<bool>) -> Option<Self> {
        let n = rows * cols;
        (x.len() == n && y.len() == n && valid.len() == n).then_some(Self {
            rows,
            cols,
            x,
            y,
            valid,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Projected position of vertex (`row`, `col`) if it is usable.
    pub fn point(&self, row: usize, col: usize) -> Option<(f64, f64)> {
        let k = row * self.cols + col;
        let (x, y) = (self.x[k], self.y[k]);
        let usable = self.valid[k]
            && x.is_finite()
            && y.is_finite()
            && x.abs() <= OFF_MAP_THRESHOLD
            && y.abs() <= OFF_MAP_THRESHOLD;
        usable.then_some((x, y))
    }
}

/// Fill each cell between vertices (i, j) and (i+1, j+1) with the colour
/// of `values[i * cols + j]`.
///
/// Cells are skipped when their value is NaN, a corner is unusable, or the
/// cell spans more than half the map width (a wrap across the map edge).
/// Returns the number of cells drawn.
pub fn draw_pcolormesh(
    layer: &mut RgbaImage,
    view: &MapView,
    mesh: &ProjectedMesh,
    values: &[f64],
    cmap: &Colormap,
    norm: &Normalization,
) -> usize {
    if mesh.rows < 2 || mesh.cols < 2 || values.len() != mesh.rows * mesh.cols {
        debug!(rows = mesh.rows, cols = mesh.cols, values = values.len(), "Nothing to mesh");
        return 0;
    }

    let max_span = view.extent().width() / 2.0;
    let (width, height) = view.size();
    let mut drawn = 0;

    for i in 0..mesh.rows - 1 {
        for j in 0..mesh.cols - 1 {
            let value = values[i * mesh.cols + j];
            if value.is_nan() {
                continue;
            }

            let corners = [
                mesh.point(i, j),
                mesh.point(i, j + 1),
                mesh.point(i + 1, j + 1),
                mesh.point(i + 1, j),
            ];
            let mut projected = [(0.0, 0.0); 4];
            let mut complete = true;
            for (slot, corner) in projected.iter_mut().zip(corners) {
                match corner {
                    Some(p) => *slot = p,
                    None => {
                        complete = false;
                        break;
                    }
                }
            }
            if !complete {
                continue;
            }

            let xs = projected.map(|p| p.0);
            let x_span = xs.iter().cloned().fold(f64::MIN, f64::max)
                - xs.iter().cloned().fold(f64::MAX, f64::min);
            if x_span > max_span {
                continue;
            }

            let pixels = projected.map(|(x, y)| view.to_pixel(x, y));
            if outside_layer(&pixels, width, height) {
                continue;
            }

            let color = cmap.at(norm.apply(value)).to_rgba();
            fill_quad(layer, &pixels, color);
            drawn += 1;
        }
    }

    debug!(cells = drawn, "Drew pseudocolor mesh");
    drawn
}

fn outside_layer(pixels: &[(f64, f64); 4], width: u32, height: u32) -> bool {
    pixels.iter().all(|p| p.0 < 0.0)
        || pixels.iter().all(|p| p.0 >= width as f64)
        || pixels.iter().all(|p| p.1 < 0.0)
        || pixels.iter().all(|p| p.1 >= height as f64)
}

fn fill_quad(layer: &mut RgbaImage, pixels: &[(f64, f64); 4], color: image::Rgba<u8>) {
    let mut points: Vec<Point<i32>> = Vec::with_capacity(4);
    for &(px, py) in pixels {
        let p = Point::new(
            px.clamp(-PIXEL_LIMIT, PIXEL_LIMIT).round() as i32,
            py.clamp(-PIXEL_LIMIT, PIXEL_LIMIT).round() as i32,
        );
        if !points.contains(&p) {
            points.push(p);
        }
    }

    match points.len() {
        0 => {}
        1 | 2 => {
            // cell smaller than a pixel: a dot or a short segment
            let a = points[0];
            let b = points[points.len() - 1];
            draw_line_segment_mut(layer, (a.x as f32, a.y as f32), (b.x as f32, b.y as f32), color);
        }
        _ => draw_polygon_mut(layer, &points, color),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Axes;
    use crate::colormap::ColormapRegistry;
    use viewer_common::BoundingBox;

    fn grid_mesh(rows: usize, cols: usize) -> ProjectedMesh {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..rows {
            for j in 0..cols {
                x.push(j as f64);
                y.push((rows - 1 - i) as f64);
            }
        }
        ProjectedMesh::new(rows, cols, x, y, vec![true; rows * cols]).unwrap()
    }

    fn view(rows: usize, cols: usize, px: u32) -> MapView {
        let extent = BoundingBox::new(0.0, 0.0, (cols - 1) as f64, (rows - 1) as f64);
        MapView::fit(extent, &Axes::new(0, 0, px, px))
    }

    #[test]
    fn test_cells_take_lower_left_value() {
        let registry = ColormapRegistry::builtin();
        let gray = registry.get("gray").unwrap();
        let norm = Normalization::linear(0.0, 1.0);
        let mesh = grid_mesh(2, 3);
        let view = view(2, 3, 100);
        let mut layer = view.new_layer();
        // left cell black, right cell white; last row/column unused
        let values = [0.0, 1.0, 0.5, 0.5, 0.5, 0.5];
        let drawn = draw_pcolormesh(&mut layer, &view, &mesh, &values, gray, &norm);
        assert_eq!(drawn, 2);
        assert_eq!(layer.get_pixel(20, 25)[0], 0);
        assert_eq!(layer.get_pixel(80, 25)[0], 255);
    }

    #[test]
    fn test_nan_and_invalid_vertices_skipped() {
        let registry = ColormapRegistry::builtin();
        let cmap = registry.get("viridis").unwrap();
        let norm = Normalization::linear(0.0, 1.0);
        let mut mesh = grid_mesh(2, 3);
        mesh.valid[2] = false;
        let view = view(2, 3, 100);
        let mut layer = view.new_layer();
        let values = [f64::NAN, 1.0, 0.0, 0.0, 0.0, 0.0];
        let drawn = draw_pcolormesh(&mut layer, &view, &mesh, &values, cmap, &norm);
        assert_eq!(drawn, 0);
        assert!(layer.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_wrapping_cell_skipped() {
        let registry = ColormapRegistry::builtin();
        let cmap = registry.get("viridis").unwrap();
        let norm = Normalization::linear(0.0, 1.0);
        // second column jumps across the whole map
        let x = vec![0.0, 10.0, 0.0, 10.0];
        let y = vec![1.0, 1.0, 0.0, 0.0];
        let mesh = ProjectedMesh::new(2, 2, x, y, vec![true; 4]).unwrap();
        let view = MapView::fit(BoundingBox::new(0.0, 0.0, 10.0, 1.0), &Axes::new(0, 0, 100, 10));
        let mut layer = view.new_layer();
        let drawn = draw_pcolormesh(&mut layer, &view, &mesh, &[0.5; 4], cmap, &norm);
        assert_eq!(drawn, 0);
    }

    #[test]
    fn test_sub_pixel_cells_still_drawn() {
        let registry = ColormapRegistry::builtin();
        let cmap = registry.get("gray").unwrap();
        let norm = Normalization::linear(0.0, 1.0);
        let mesh = grid_mesh(50, 50);
        let view = view(50, 50, 10);
        let mut layer = view.new_layer();
        let drawn = draw_pcolormesh(&mut layer, &view, &mesh, &vec![1.0; 2500], cmap, &norm);
        assert_eq!(drawn, 49 * 49);
        assert!(layer.pixels().filter(|p| p[3] == 255).count() > 50);
    }

    #[test]
    fn test_shape_mismatch_draws_nothing() {
        assert!(ProjectedMesh::new(2, 2, vec![0.0; 3], vec![0.0; 4], vec![true; 4]).is_none());
    }
}
