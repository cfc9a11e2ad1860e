//! Native NetCDF access using the netcdf library.
//!
//! The file is opened read-only and kept open for the lifetime of the
//! [`NetCdfDataset`]; every read is synchronous.

use std::path::{Path, PathBuf};
use std::sync::Once;

use indexmap::IndexMap;
use netcdf::AttributeValue;
use tracing::{debug, info};

use crate::dataset::{check_plane_request, AttrValue, Dataset, VariableMeta};
use crate::error::{DatasetError, DatasetResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when probing for optional
/// attributes that don't exist). This disables that output by calling
/// H5Eset_auto2 with null handlers. Safe to call multiple times.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Open a netCDF file read-only.
pub fn open<P: AsRef<Path>>(path: P) -> DatasetResult<NetCdfDataset> {
    NetCdfDataset::open(path)
}

/// A netCDF-4 file opened read-only.
pub struct NetCdfDataset {
    path: PathBuf,
    file: netcdf::File,
}

impl NetCdfDataset {
    pub fn open<P: AsRef<Path>>(path: P) -> DatasetResult<Self> {
        silence_hdf5_errors();

        let path = path.as_ref();
        let file = netcdf::open(path).map_err(|e| DatasetError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        info!(
            path = %path.display(),
            variables = file.variables().count(),
            dimensions = file.dimensions().count(),
            "Opened dataset"
        );

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn nc_variable(&self, name: &str) -> DatasetResult<netcdf::Variable<'_>> {
        self.file
            .variable(name)
            .ok_or_else(|| DatasetError::MissingVariable(name.to_string()))
    }
}

impl Dataset for NetCdfDataset {
    fn variable_names(&self) -> Vec<String> {
        self.file.variables().map(|v| v.name()).collect()
    }

    fn dimension_names(&self) -> Vec<String> {
        self.file.dimensions().map(|d| d.name()).collect()
    }

    fn variable(&self, name: &str) -> DatasetResult<VariableMeta> {
        let var = self.nc_variable(name)?;

        let dimensions = var.dimensions().iter().map(|d| d.name()).collect();
        let shape = var.dimensions().iter().map(|d| d.len()).collect();

        let mut attributes = IndexMap::new();
        for attr in var.attributes() {
            let value = attr
                .value()
                .map_err(|e| DatasetError::read(format!("{}:{}", name, attr.name()), e))?;
            attributes.insert(attr.name().to_string(), flatten_attribute(value));
        }

        Ok(VariableMeta {
            dimensions,
            shape,
            attributes,
        })
    }

    fn read_all(&self, name: &str) -> DatasetResult<Vec<f64>> {
        let var = self.nc_variable(name)?;
        var.get_values::<f64, _>(..)
            .map_err(|e| DatasetError::read(name, e))
    }

    fn read_plane(&self, name: &str, leading: &[usize]) -> DatasetResult<Vec<f64>> {
        let meta = self.variable(name)?;
        check_plane_request(name, &meta, leading)?;
        let var = self.nc_variable(name)?;

        debug!(variable = name, ?leading, "Reading plane");

        let values = match *leading {
            [] => var.get_values::<f64, _>(..),
            [t] => var.get_values::<f64, _>((t, .., ..)),
            [t, l] => var.get_values::<f64, _>((t, l, .., ..)),
            _ => {
                return Err(DatasetError::InvalidShape(format!(
                    "variable '{}' has too many leading dimensions ({})",
                    name,
                    leading.len()
                )))
            }
        };

        values.map_err(|e| DatasetError::read(name, e))
    }
}

/// Flatten a netCDF attribute into a scalar or string value.
///
/// Array attributes become a comma-separated string.
fn flatten_attribute(value: AttributeValue) -> AttrValue {
    fn join<T: ToString>(values: &[T]) -> AttrValue {
        AttrValue::Text(
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }

    match value {
        AttributeValue::Uchar(v) => AttrValue::Int(v as i64),
        AttributeValue::Schar(v) => AttrValue::Int(v as i64),
        AttributeValue::Ushort(v) => AttrValue::Int(v as i64),
        AttributeValue::Short(v) => AttrValue::Int(v as i64),
        AttributeValue::Uint(v) => AttrValue::Int(v as i64),
        AttributeValue::Int(v) => AttrValue::Int(v as i64),
        AttributeValue::Longlong(v) => AttrValue::Int(v),
        AttributeValue::Ulonglong(v) => AttrValue::Int(v as i64),
        AttributeValue::Float(v) => AttrValue::Float(v as f64),
        AttributeValue::Double(v) => AttrValue::Float(v),
        AttributeValue::Str(s) => AttrValue::Text(s),
        AttributeValue::Shorts(v) => join(&v),
        AttributeValue::Ints(v) => join(&v),
        AttributeValue::Floats(v) => join(&v),
        AttributeValue::Doubles(v) => join(&v),
        AttributeValue::Strs(v) => AttrValue::Text(v.join(", ")),
        other => AttrValue::Text(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file_is_open_error() {
        let result = NetCdfDataset::open("/nonexistent/era5.nc");
        assert!(matches!(result, Err(DatasetError::Open { .. })));
    }

    #[test]
    fn test_flatten_scalar_attributes() {
        assert_eq!(flatten_attribute(AttributeValue::Short(-32767)), AttrValue::Int(-32767));
        assert_eq!(flatten_attribute(AttributeValue::Double(0.5)), AttrValue::Float(0.5));
        assert_eq!(
            flatten_attribute(AttributeValue::Str("K".to_string())),
            AttrValue::Text("K".to_string())
        );
    }

    #[test]
    fn test_flatten_array_attribute() {
        let flat = flatten_attribute(AttributeValue::Doubles(vec![1.0, 2.5]));
        assert_eq!(flat, AttrValue::Text("1, 2.5".to_string()));
    }
}
