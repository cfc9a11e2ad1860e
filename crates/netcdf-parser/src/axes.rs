//! Time, pressure-level and coordinate axes.

use chrono::NaiveDate;
use std::fmt;
use tracing::{debug, warn};
use viewer_common::TimeUnits;

use crate::dataset::Dataset;
use crate::error::{DatasetError, DatasetResult};
use crate::slice::read_unpacked;

/// Accepted names for the time axis, tried in order.
pub const TIME_NAMES: [&str; 2] = ["time", "valid_time"];

/// Accepted names for the vertical pressure-level axis, tried in order.
pub const LEVEL_NAMES: [&str; 3] = ["level", "pressure_level", "plev"];

/// Accepted (longitude, latitude) variable name pairs, tried in order.
pub const COORDINATE_NAMES: [(&str, &str); 2] = [("lon", "lat"), ("longitude", "latitude")];

/// One decoded entry of the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestep {
    pub index: usize,
    /// `None` when the offset cannot be represented as a date.
    pub date: Option<NaiveDate>,
}

impl fmt::Display for Timestep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.date {
            Some(date) => write!(f, "{} : {}", self.index, date.format("%Y-%m-%d")),
            None => write!(f, "{} : invalid date", self.index),
        }
    }
}

/// The raw time axis plus its units. Dates are decoded on iteration, so
/// the sequence can be walked any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct Timesteps {
    offsets: Vec<f64>,
    units: TimeUnits,
}

impl Timesteps {
    pub fn new(offsets: Vec<f64>, units: TimeUnits) -> Self {
        Self { offsets, units }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn units(&self) -> &TimeUnits {
        &self.units
    }

    pub fn get(&self, index: usize) -> Option<Timestep> {
        self.offsets.get(index).map(|&offset| Timestep {
            index,
            date: self.units.decode_date(offset),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Timestep> + '_ {
        self.offsets.iter().enumerate().map(|(index, &offset)| Timestep {
            index,
            date: self.units.decode_date(offset),
        })
    }

    /// `"{i} : {YYYY-MM-DD}"` labels, in axis order.
    pub fn labels(&self) -> Vec<String> {
        self.iter().map(|t| t.to_string()).collect()
    }
}

/// One entry of the pressure-level axis, value as stored (typically hPa).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureLevel {
    pub index: usize,
    pub value: f64,
}

impl fmt::Display for PressureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.index, self.value)
    }
}

/// 1-D longitude and latitude arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub lons: Vec<f64>,
    pub lats: Vec<f64>,
}

fn find_time_axis<D: Dataset + ?Sized>(dataset: &D) -> Option<&'static str> {
    TIME_NAMES.into_iter().find(|name| dataset.has_variable(name))
}

fn find_level_axis<D: Dataset + ?Sized>(dataset: &D) -> Option<&'static str> {
    LEVEL_NAMES
        .into_iter()
        .find(|name| dataset.has_dimension(name) || dataset.has_variable(name))
}

/// Decode the time axis.
///
/// Offsets are interpreted with the time variable's CF `units` attribute
/// when it parses, otherwise as hours since 1900-01-01.
pub fn list_timesteps<D: Dataset + ?Sized>(dataset: &D) -> DatasetResult<Timesteps> {
    let name = find_time_axis(dataset)
        .ok_or_else(|| DatasetError::MissingAxis(format!("time (tried {:?})", TIME_NAMES)))?;
    let meta = dataset.variable(name)?;

    let units = match meta.attribute("units").and_then(|u| u.as_str()) {
        Some(text) => TimeUnits::parse(text).unwrap_or_else(|e| {
            warn!(variable = name, error = %e, "Unrecognized time units, assuming hours since 1900-01-01");
            TimeUnits::reanalysis_default()
        }),
        None => TimeUnits::reanalysis_default(),
    };

    let offsets = read_unpacked(dataset, name)?;
    debug!(variable = name, count = offsets.len(), "Read time axis");
    Ok(Timesteps::new(offsets, units))
}

/// True if the dataset has a vertical pressure-level dimension or variable.
pub fn has_pressure_levels<D: Dataset + ?Sized>(dataset: &D) -> bool {
    find_level_axis(dataset).is_some()
}

/// The pressure-level axis as (index, raw value) pairs.
///
/// A level dimension without a coordinate variable yields its indices as
/// values.
pub fn list_pressure_levels<D: Dataset + ?Sized>(dataset: &D) -> DatasetResult<Vec<PressureLevel>> {
    let name = find_level_axis(dataset).ok_or_else(|| {
        DatasetError::MissingAxis(format!("pressure level (tried {:?})", LEVEL_NAMES))
    })?;

    let values = if dataset.has_variable(name) {
        read_unpacked(dataset, name)?
    } else {
        let len = dataset
            .variable_names()
            .iter()
            .filter_map(|v| dataset.variable(v).ok())
            .find_map(|meta| {
                meta.dimensions
                    .iter()
                    .position(|d| d == name)
                    .map(|i| meta.shape[i])
            })
            .unwrap_or(0);
        (0..len).map(|i| i as f64).collect()
    };

    Ok(values
        .into_iter()
        .enumerate()
        .map(|(index, value)| PressureLevel { index, value })
        .collect())
}

/// Read the longitude/latitude arrays, trying each accepted name pair in
/// order.
pub fn read_coordinates<D: Dataset + ?Sized>(dataset: &D) -> DatasetResult<Coordinates> {
    for (lon_name, lat_name) in COORDINATE_NAMES {
        if dataset.has_variable(lon_name) && dataset.has_variable(lat_name) {
            let lons = read_unpacked(dataset, lon_name)?;
            let lats = read_unpacked(dataset, lat_name)?;
            debug!(lon = lon_name, lat = lat_name, nlon = lons.len(), nlat = lats.len(), "Read coordinates");
            return Ok(Coordinates { lons, lats });
        }
    }
    Err(DatasetError::MissingAxis(format!(
        "longitude/latitude (tried {:?})",
        COORDINATE_NAMES
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDataset;

    #[test]
    fn test_timestep_labels() {
        let steps = Timesteps::new(vec![0.0, 24.0, 47.0], TimeUnits::default());
        assert_eq!(
            steps.labels(),
            vec!["0 : 1900-01-01", "1 : 1900-01-02", "2 : 1900-01-02"]
        );
    }

    #[test]
    fn test_timesteps_restartable() {
        let steps = Timesteps::new(vec![0.0, 24.0], TimeUnits::default());
        let first: Vec<_> = steps.iter().collect();
        let second: Vec<_> = steps.iter().collect();
        assert_eq!(first, second);
        assert_eq!(steps.get(1).map(|t| t.to_string()), Some("1 : 1900-01-02".to_string()));
        assert!(steps.get(2).is_none());
    }

    #[test]
    fn test_cf_units_honoured() {
        let ds = MemoryDataset::new()
            .with_dimension("valid_time", 2)
            .with_variable("valid_time", &["valid_time"], vec![0.0, 86400.0])
            .unwrap()
            .with_attribute("valid_time", "units", "seconds since 1970-01-01")
            .unwrap();
        let labels = list_timesteps(&ds).unwrap().labels();
        assert_eq!(labels, vec!["0 : 1970-01-01", "1 : 1970-01-02"]);
    }

    #[test]
    fn test_level_dimension_without_variable() {
        let ds = MemoryDataset::new()
            .with_dimension("level", 2)
            .with_dimension("x", 1)
            .with_variable("q", &["level", "x"], vec![1.0, 2.0])
            .unwrap();
        let levels = list_pressure_levels(&ds).unwrap();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[1].value, 1.0);
    }

    #[test]
    fn test_coordinate_fallback_pair() {
        let ds = MemoryDataset::new()
            .with_dimension("longitude", 2)
            .with_dimension("latitude", 1)
            .with_variable("longitude", &["longitude"], vec![0.0, 1.0])
            .unwrap()
            .with_variable("latitude", &["latitude"], vec![5.0])
            .unwrap();
        let coords = read_coordinates(&ds).unwrap();
        assert_eq!(coords.lons, vec![0.0, 1.0]);
        assert_eq!(coords.lats, vec![5.0]);
    }

    #[test]
    fn test_missing_coordinates() {
        let ds = MemoryDataset::new();
        assert!(matches!(read_coordinates(&ds), Err(DatasetError::MissingAxis(_))));
    }
}
