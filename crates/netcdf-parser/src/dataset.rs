//! The dataset handle seam.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DatasetResult;

/// A flattened attribute value: scalar or string, never nested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttrValue {
    /// Numeric view of the attribute, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(i) => Some(*i as f64),
            AttrValue::Float(f) => Some(*f),
            AttrValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Int(i) => write!(f, "{}", i),
            AttrValue::Float(v) => write!(f, "{}", v),
            AttrValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

/// Dimensions, shape and attributes of one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableMeta {
    pub dimensions: Vec<String>,
    pub shape: Vec<usize>,
    pub attributes: IndexMap<String, AttrValue>,
}

impl VariableMeta {
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }
}

/// Read-only handle to a multi-dimensional gridded array store.
///
/// Values are returned raw (packed values are not unpacked); callers that
/// need physical values go through [`crate::slice::read_slice`] or
/// [`crate::axes`], which honour `scale_factor`/`add_offset`/`_FillValue`.
pub trait Dataset {
    /// Variable names, in the dataset's declared order.
    fn variable_names(&self) -> Vec<String>;

    /// Dimension names, in the dataset's declared order.
    fn dimension_names(&self) -> Vec<String>;

    /// Dimensions, shape and attributes of a variable.
    fn variable(&self, name: &str) -> DatasetResult<VariableMeta>;

    /// Every value of a variable, flattened in row-major order.
    fn read_all(&self, name: &str) -> DatasetResult<Vec<f64>>;

    /// The plane of a variable obtained by fixing its leading indices and
    /// reading the two trailing dimensions fully, in row-major order.
    fn read_plane(&self, name: &str, leading: &[usize]) -> DatasetResult<Vec<f64>>;

    fn has_variable(&self, name: &str) -> bool {
        self.variable_names().iter().any(|v| v == name)
    }

    fn has_dimension(&self, name: &str) -> bool {
        self.dimension_names().iter().any(|d| d == name)
    }
}

/// Validate a plane request against a variable's shape.
///
/// The variable must have exactly `leading.len() + 2` dimensions and every
/// leading index must be in range. Returns the plane's (rows, cols).
pub fn check_plane_request(
    name: &str,
    meta: &VariableMeta,
    leading: &[usize],
) -> DatasetResult<(usize, usize)> {
    use crate::error::DatasetError;

    if meta.ndim() != leading.len() + 2 {
        return Err(DatasetError::InvalidShape(format!(
            "variable '{}' has {} dimensions, cannot take a 2-D plane after fixing {} indices",
            name,
            meta.ndim(),
            leading.len()
        )));
    }

    for (i, &index) in leading.iter().enumerate() {
        if index >= meta.shape[i] {
            return Err(DatasetError::IndexOutOfRange {
                dimension: meta.dimensions[i].clone(),
                index,
                len: meta.shape[i],
            });
        }
    }

    let n = meta.ndim();
    Ok((meta.shape[n - 2], meta.shape[n - 1]))
}
