//! Metadata extraction and axis decoding against synthetic reanalysis data.

use netcdf_parser::{
    extract, has_pressure_levels, list_plottable_variables, list_pressure_levels, list_timesteps,
    read_coordinates, read_slice, DatasetError, MemoryDataset,
};
use test_utils::{assert_cells_close, era5_pressure_levels, era5_single_level, require_test_file};

#[test]
fn test_plottable_variables_exclude_coordinates() {
    let ds = era5_single_level(8, 5, 3);
    assert_eq!(list_plottable_variables(&ds), vec!["t2m", "u10"]);

    let ds = era5_pressure_levels(4, 3, 2, &[500.0, 850.0]);
    assert_eq!(list_plottable_variables(&ds), vec!["z"]);
}

#[test]
fn test_snapshot_keys_are_variable_names() {
    let ds = era5_single_level(8, 5, 3);
    let snapshot = extract(&ds).unwrap();
    assert_eq!(
        snapshot.variable_names().collect::<Vec<_>>(),
        vec!["longitude", "latitude", "time", "t2m", "u10"]
    );
    assert_eq!(snapshot.get("t2m").unwrap().dimensions, vec!["time", "latitude", "longitude"]);
}

#[test]
fn test_timesteps_one_label_per_element() {
    let ds = era5_single_level(4, 3, 3);
    let steps = list_timesteps(&ds).unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(
        steps.labels(),
        vec!["0 : 2020-01-01", "1 : 2020-01-02", "2 : 2020-01-03"]
    );
}

#[test]
fn test_timesteps_without_units_use_1900_epoch() {
    let ds = MemoryDataset::new()
        .with_dimension("time", 2)
        .with_variable("time", &["time"], vec![0.0, 24.0])
        .unwrap();
    assert_eq!(
        list_timesteps(&ds).unwrap().labels(),
        vec!["0 : 1900-01-01", "1 : 1900-01-02"]
    );
}

#[test]
fn test_missing_time_axis() {
    let ds = MemoryDataset::new();
    assert!(matches!(list_timesteps(&ds), Err(DatasetError::MissingAxis(_))));
}

#[test]
fn test_pressure_levels() {
    let ds = era5_pressure_levels(4, 3, 2, &[500.0, 850.0]);
    assert!(has_pressure_levels(&ds));
    let levels = list_pressure_levels(&ds).unwrap();
    let labels: Vec<String> = levels.iter().map(|l| l.to_string()).collect();
    assert_eq!(labels, vec!["0 : 500", "1 : 850"]);

    let single = era5_single_level(4, 3, 1);
    assert!(!has_pressure_levels(&single));
    assert!(matches!(
        list_pressure_levels(&single),
        Err(DatasetError::MissingAxis(_))
    ));
}

#[test]
fn test_coordinates_both_conventions() {
    let long_names = era5_single_level(4, 3, 1);
    let short_names = era5_pressure_levels(4, 3, 1, &[500.0]);
    let a = read_coordinates(&long_names).unwrap();
    let b = read_coordinates(&short_names).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.lons, vec![0.0, 90.0, 180.0, 270.0]);
    assert_eq!(a.lats, vec![90.0, 0.0, -90.0]);
}

#[test]
fn test_slice_3d_and_4d() {
    let ds = era5_single_level(4, 3, 2);
    let grid = read_slice(&ds, "t2m", 1, None).unwrap();
    assert_eq!((grid.rows(), grid.cols()), (3, 4));
    assert_eq!(grid.get(0, 0), 251.0);

    let ds = era5_pressure_levels(4, 3, 2, &[500.0, 850.0]);
    let grid = read_slice(&ds, "z", 1, Some(1)).unwrap();
    assert!(grid.values().iter().all(|&v| v == 101.0));

    assert!(matches!(
        read_slice(&ds, "z", 0, None),
        Err(DatasetError::MissingAxis(_))
    ));
    assert!(matches!(
        read_slice(&ds, "z", 5, Some(0)),
        Err(DatasetError::IndexOutOfRange { .. })
    ));
}

#[test]
fn test_slice_unpacks_packed_values() {
    let ds = MemoryDataset::new()
        .with_dimension("time", 1)
        .with_dimension("lat", 1)
        .with_dimension("lon", 3)
        .with_variable("sst", &["time", "lat", "lon"], vec![0.0, 10.0, -32767.0])
        .unwrap()
        .with_attribute("sst", "scale_factor", 0.01)
        .unwrap()
        .with_attribute("sst", "add_offset", 280.0)
        .unwrap()
        .with_attribute("sst", "_FillValue", -32767_i64)
        .unwrap();
    let grid = read_slice(&ds, "sst", 0, None).unwrap();
    assert_cells_close!(grid.values(), [280.0, 280.1, f64::NAN], 1e-9);
}

#[test]
fn test_open_real_sample() {
    let path = require_test_file!("era5_sample.nc");
    let ds = netcdf_parser::open(&path).unwrap();
    let snapshot = extract(&ds).unwrap();
    assert!(!snapshot.plottable_variables().is_empty());
    assert!(read_coordinates(&ds).is_ok());
}
