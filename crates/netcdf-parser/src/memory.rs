//! In-memory dataset used by tests and tooling.

use indexmap::IndexMap;

use crate::dataset::{check_plane_request, AttrValue, Dataset, VariableMeta};
use crate::error::{DatasetError, DatasetResult};

#[derive(Debug, Clone)]
struct MemoryVariable {
    meta: VariableMeta,
    values: Vec<f64>,
}

/// A dataset held entirely in memory.
///
/// Dimensions must be declared before the variables that use them; variable
/// values are row-major and must match the product of their dimension lengths.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataset {
    dimensions: IndexMap<String, usize>,
    variables: IndexMap<String, MemoryVariable>,
}

impl MemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a dimension.
    pub fn with_dimension(mut self, name: &str, len: usize) -> Self {
        self.dimensions.insert(name.to_string(), len);
        self
    }

    /// Add a variable over previously declared dimensions.
    pub fn with_variable(mut self, name: &str, dims: &[&str], values: Vec<f64>) -> DatasetResult<Self> {
        let mut shape = Vec::with_capacity(dims.len());
        for dim in dims {
            let len = self
                .dimensions
                .get(*dim)
                .ok_or_else(|| DatasetError::MissingAxis(dim.to_string()))?;
            shape.push(*len);
        }

        let expected: usize = shape.iter().product();
        if values.len() != expected {
            return Err(DatasetError::InvalidShape(format!(
                "variable '{}' has {} values, shape {:?} needs {}",
                name,
                values.len(),
                shape,
                expected
            )));
        }

        self.variables.insert(
            name.to_string(),
            MemoryVariable {
                meta: VariableMeta {
                    dimensions: dims.iter().map(|d| d.to_string()).collect(),
                    shape,
                    attributes: IndexMap::new(),
                },
                values,
            },
        );
        Ok(self)
    }

    /// Attach an attribute to an existing variable.
    pub fn with_attribute(
        mut self,
        variable: &str,
        name: &str,
        value: impl Into<AttrValue>,
    ) -> DatasetResult<Self> {
        let var = self
            .variables
            .get_mut(variable)
            .ok_or_else(|| DatasetError::MissingVariable(variable.to_string()))?;
        var.meta.attributes.insert(name.to_string(), value.into());
        Ok(self)
    }

    fn get(&self, name: &str) -> DatasetResult<&MemoryVariable> {
        self.variables
            .get(name)
            .ok_or_else(|| DatasetError::MissingVariable(name.to_string()))
    }
}

impl Dataset for MemoryDataset {
    fn variable_names(&self) -> Vec<String> {
        self.variables.keys().cloned().collect()
    }

    fn dimension_names(&self) -> Vec<String> {
        self.dimensions.keys().cloned().collect()
    }

    fn variable(&self, name: &str) -> DatasetResult<VariableMeta> {
        Ok(self.get(name)?.meta.clone())
    }

    fn read_all(&self, name: &str) -> DatasetResult<Vec<f64>> {
        Ok(self.get(name)?.values.clone())
    }

    fn read_plane(&self, name: &str, leading: &[usize]) -> DatasetResult<Vec<f64>> {
        let var = self.get(name)?;
        let (rows, cols) = check_plane_request(name, &var.meta, leading)?;
        let plane = rows * cols;

        // Row-major offset of the plane: fold the leading indices over the leading extents.
        let offset = leading
            .iter()
            .zip(&var.meta.shape)
            .fold(0usize, |acc, (&index, &len)| acc * len + index)
            * plane;

        Ok(var.values[offset..offset + plane].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> MemoryDataset {
        MemoryDataset::new()
            .with_dimension("time", 2)
            .with_dimension("level", 3)
            .with_dimension("lat", 2)
            .with_dimension("lon", 2)
            .with_variable(
                "t",
                &["time", "level", "lat", "lon"],
                (0..24).map(|v| v as f64).collect(),
            )
            .unwrap()
    }

    #[test]
    fn test_plane_offsets() {
        let ds = cube();
        assert_eq!(ds.read_plane("t", &[0, 0]).unwrap(), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(ds.read_plane("t", &[0, 2]).unwrap(), vec![8.0, 9.0, 10.0, 11.0]);
        assert_eq!(ds.read_plane("t", &[1, 1]).unwrap(), vec![16.0, 17.0, 18.0, 19.0]);
    }

    #[test]
    fn test_plane_index_out_of_range() {
        let ds = cube();
        let err = ds.read_plane("t", &[2, 0]).unwrap_err();
        assert!(matches!(err, DatasetError::IndexOutOfRange { index: 2, len: 2, .. }));
    }

    #[test]
    fn test_plane_wrong_rank() {
        let ds = cube();
        assert!(matches!(
            ds.read_plane("t", &[0]),
            Err(DatasetError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_rejects_wrong_value_count() {
        let result = MemoryDataset::new()
            .with_dimension("x", 3)
            .with_variable("x", &["x"], vec![1.0, 2.0]);
        assert!(matches!(result, Err(DatasetError::InvalidShape(_))));
    }

    #[test]
    fn test_rejects_undeclared_dimension() {
        let result = MemoryDataset::new().with_variable("x", &["x"], vec![1.0]);
        assert!(matches!(result, Err(DatasetError::MissingAxis(_))));
    }
}
