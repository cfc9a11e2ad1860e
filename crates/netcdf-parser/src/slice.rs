//! Two-dimensional data slices.

use tracing::debug;

use crate::dataset::{Dataset, VariableMeta};
use crate::error::{DatasetError, DatasetResult};

/// A row-major 2-D grid of values, shaped (lat-count, lon-count).
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2D {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Grid2D {
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> DatasetResult<Self> {
        if values.len() != rows * cols {
            return Err(DatasetError::InvalidShape(format!(
                "{} values cannot form a {}x{} grid",
                values.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, values })
    }

    /// Build from nested rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> DatasetResult<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != n_cols) {
            return Err(DatasetError::InvalidShape("ragged rows".to_string()));
        }
        Self::new(n_rows, n_cols, rows.into_iter().flatten().collect())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.cols..(row + 1) * self.cols]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Mutable iterator over rows.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, f64> {
        // chunks_exact_mut panics on a zero chunk size
        let cols = self.cols.max(1);
        self.values.chunks_exact_mut(cols)
    }

    /// Nested rows, mostly for assertions.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|r| self.row(r).to_vec()).collect()
    }

    /// Minimum and maximum over the finite values, `None` if there are none.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Packing attributes of a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Packing {
    pub scale_factor: f64,
    pub add_offset: f64,
    pub fill_value: Option<f64>,
    pub missing_value: Option<f64>,
}

impl Packing {
    pub fn from_meta(meta: &VariableMeta) -> Self {
        let num = |name: &str| meta.attribute(name).and_then(|a| a.as_f64());
        Self {
            scale_factor: num("scale_factor").unwrap_or(1.0),
            add_offset: num("add_offset").unwrap_or(0.0),
            fill_value: num("_FillValue"),
            missing_value: num("missing_value"),
        }
    }

    /// Physical value of a raw value; fill and missing values become NaN.
    pub fn unpack(&self, raw: f64) -> f64 {
        if raw.is_nan() || Some(raw) == self.fill_value || Some(raw) == self.missing_value {
            return f64::NAN;
        }
        raw * self.scale_factor + self.add_offset
    }
}

/// Read every value of a 1-D (or any) variable, unpacked.
pub(crate) fn read_unpacked<D: Dataset + ?Sized>(dataset: &D, name: &str) -> DatasetResult<Vec<f64>> {
    let packing = Packing::from_meta(&dataset.variable(name)?);
    Ok(dataset
        .read_all(name)?
        .into_iter()
        .map(|v| packing.unpack(v))
        .collect())
}

/// Extract the (lat, lon) plane of `variable` at a time index and, for
/// variables with a vertical axis, a pressure-level index.
///
/// Variables laid out as (time, lat, lon) ignore `level_index`; variables
/// laid out as (time, level, lat, lon) require it.
pub fn read_slice<D: Dataset + ?Sized>(
    dataset: &D,
    variable: &str,
    time_index: usize,
    level_index: Option<usize>,
) -> DatasetResult<Grid2D> {
    let meta = dataset.variable(variable)?;

    let leading = match (meta.ndim(), level_index) {
        (4, Some(level)) => vec![time_index, level],
        (4, None) => {
            return Err(DatasetError::MissingAxis(format!(
                "variable '{}' has a pressure-level axis but no level index was given",
                variable
            )))
        }
        (3, level) => {
            if level.is_some() {
                debug!(variable, "Variable has no level axis, ignoring level index");
            }
            vec![time_index]
        }
        (n, _) => {
            return Err(DatasetError::InvalidShape(format!(
                "variable '{}' has {} dimensions, expected (time, [level,] lat, lon)",
                variable, n
            )))
        }
    };

    let n = meta.ndim();
    let (rows, cols) = (meta.shape[n - 2], meta.shape[n - 1]);
    let packing = Packing::from_meta(&meta);

    let raw = dataset.read_plane(variable, &leading)?;
    let values = raw.into_iter().map(|v| packing.unpack(v)).collect();

    Grid2D::new(rows, cols, values)
}
