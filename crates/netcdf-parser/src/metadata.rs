//! Metadata extraction.
//!
//! A [`MetadataSnapshot`] is built once per dataset load and never mutated;
//! loading another dataset produces a new snapshot.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::axes::LEVEL_NAMES;
use crate::dataset::{Dataset, VariableMeta};
use crate::error::DatasetResult;

/// Variable name to dimensions, shape and attributes, in declared order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetadataSnapshot {
    variables: IndexMap<String, VariableMeta>,
}

impl MetadataSnapshot {
    pub fn get(&self, name: &str) -> Option<&VariableMeta> {
        self.variables.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &VariableMeta)> {
        self.variables.iter()
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Every dimension name used by some variable, first use first.
    pub fn dimension_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for meta in self.variables.values() {
            for dim in &meta.dimensions {
                if !names.contains(dim) {
                    names.push(dim.clone());
                }
            }
        }
        names
    }

    /// Variables that are not coordinate axes.
    pub fn plottable_variables(&self) -> Vec<String> {
        let dims = self.dimension_names();
        self.variables
            .keys()
            .filter(|name| !dims.contains(name))
            .cloned()
            .collect()
    }

    /// True if any variable is laid out along a pressure-level axis.
    pub fn has_pressure_levels(&self) -> bool {
        self.variables.iter().any(|(name, meta)| {
            LEVEL_NAMES.contains(&name.as_str())
                || meta.dimensions.iter().any(|d| LEVEL_NAMES.contains(&d.as_str()))
        })
    }
}

/// Record dimensions, shape and attributes of every variable.
///
/// Fails if any variable or attribute cannot be read.
pub fn extract<D: Dataset + ?Sized>(dataset: &D) -> DatasetResult<MetadataSnapshot> {
    let mut variables = IndexMap::new();
    for name in dataset.variable_names() {
        let meta = dataset.variable(&name)?;
        debug!(variable = %name, dims = ?meta.dimensions, shape = ?meta.shape, "Extracted metadata");
        variables.insert(name, meta);
    }
    Ok(MetadataSnapshot { variables })
}

/// All variable names minus those that are also dimension names.
pub fn list_plottable_variables<D: Dataset + ?Sized>(dataset: &D) -> Vec<String> {
    let dims = dataset.dimension_names();
    dataset
        .variable_names()
        .into_iter()
        .filter(|name| !dims.contains(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDataset;

    fn dataset() -> MemoryDataset {
        MemoryDataset::new()
            .with_dimension("time", 1)
            .with_dimension("lat", 1)
            .with_dimension("lon", 2)
            .with_variable("lon", &["lon"], vec![0.0, 180.0])
            .unwrap()
            .with_variable("z", &["time", "lat", "lon"], vec![1.0, 2.0])
            .unwrap()
            .with_variable("lat", &["lat"], vec![0.0])
            .unwrap()
            .with_variable("t2m", &["time", "lat", "lon"], vec![1.0, 2.0])
            .unwrap()
            .with_attribute("t2m", "units", "K")
            .unwrap()
    }

    #[test]
    fn test_plottable_variables_keep_declared_order() {
        assert_eq!(list_plottable_variables(&dataset()), vec!["z", "t2m"]);
    }

    #[test]
    fn test_snapshot_matches_dataset() {
        let ds = dataset();
        let snapshot = extract(&ds).unwrap();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(
            snapshot.variable_names().collect::<Vec<_>>(),
            vec!["lon", "z", "lat", "t2m"]
        );
        let t2m = snapshot.get("t2m").unwrap();
        assert_eq!(t2m.shape, vec![1, 1, 2]);
        assert_eq!(t2m.attribute("units").and_then(|a| a.as_str()), Some("K"));
        assert_eq!(snapshot.plottable_variables(), vec!["z", "t2m"]);
        assert!(!snapshot.has_pressure_levels());
    }
}
