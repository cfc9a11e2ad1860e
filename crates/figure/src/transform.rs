//! Data and coordinate transforms applied before drawing.

use netcdf_parser::Grid2D;
use projection::Projection;
use rayon::prelude::*;
use renderer::{ProjectedMesh, OFF_MAP_THRESHOLD};

use crate::error::{FigureError, FigureResult};

/// Stand-in position for mesh points the projection cannot represent.
pub const SENTINEL: (f64, f64) = (-180.0, 0.0);

/// `value * coef + offset` for every cell.
pub fn apply_correction(grid: &mut Grid2D, coef: f64, offset: f64) {
    for v in grid.values_mut() {
        *v = *v * coef + offset;
    }
}

/// Exchange the two halves of every row, splitting at `cols / 2`.
///
/// Re-centres a 0..360 grid on the dateline (or the reverse). For an odd
/// column count the row is rotated left by `cols / 2`.
pub fn swap_longitude_halves(grid: &mut Grid2D) {
    let split = grid.cols() / 2;
    if split == 0 {
        return;
    }
    for row in grid.rows_mut() {
        row.rotate_left(split);
    }
}

/// Longitudes shifted by the user offset: `lon - lon_offset`.
pub fn offset_longitudes(lons: &[f64], lon_offset: f64) -> Vec<f64> {
    lons.iter().map(|lon| lon - lon_offset).collect()
}

/// Project the lat x lon mesh built from 1-D axes.
///
/// Non-finite results are replaced by [`SENTINEL`] and flagged invalid.
pub fn project_mesh(projection: &Projection, lons: &[f64], lats: &[f64]) -> FigureResult<ProjectedMesh> {
    let points: Vec<(f64, f64, bool)> = lats
        .par_iter()
        .flat_map_iter(|&lat| {
            lons.iter().map(move |&lon| {
                let (x, y) = projection.forward(lon, lat);
                if x.is_finite() && y.is_finite() {
                    (x, y, true)
                } else {
                    (SENTINEL.0, SENTINEL.1, false)
                }
            })
        })
        .collect();

    let mut x = Vec::with_capacity(points.len());
    let mut y = Vec::with_capacity(points.len());
    let mut valid = Vec::with_capacity(points.len());
    for (px, py, ok) in points {
        x.push(px);
        y.push(py);
        valid.push(ok);
    }

    ProjectedMesh::new(lats.len(), lons.len(), x, y, valid)
        .ok_or_else(|| FigureError::Shape("projected mesh size".to_string()))
}

/// Set cells whose projected position lies beyond [`OFF_MAP_THRESHOLD`] in
/// either axis to NaN. Returns the number of cells masked.
pub fn mask_out_of_domain(values: &mut [f64], x: &[f64], y: &[f64]) -> usize {
    let mut masked = 0;
    for ((v, px), py) in values.iter_mut().zip(x).zip(y) {
        if px.abs() > OFF_MAP_THRESHOLD || py.abs() > OFF_MAP_THRESHOLD {
            *v = f64::NAN;
            masked += 1;
        }
    }
    masked
}
