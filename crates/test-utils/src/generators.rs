//! Synthetic ERA5-like datasets.
//!
//! Grids follow the reanalysis layout: longitudes ascending from 0 over
//! [0, 360), latitudes descending from 90 to -90, time in hours since
//! 1900-01-01.

use netcdf_parser::MemoryDataset;

use crate::fixtures::time::HOURS_2020_01_01;

/// Longitudes `0, 360/n, ...` covering [0, 360).
pub fn lon_axis(n: usize) -> Vec<f64> {
    let step = 360.0 / n.max(1) as f64;
    (0..n).map(|i| i as f64 * step).collect()
}

/// Latitudes from 90 down to -90 inclusive.
pub fn lat_axis(n: usize) -> Vec<f64> {
    if n < 2 {
        return vec![0.0; n];
    }
    let step = 180.0 / (n - 1) as f64;
    (0..n).map(|i| 90.0 - i as f64 * step).collect()
}

/// Daily time offsets starting at 2020-01-01.
pub fn daily_time_axis(n: usize) -> Vec<f64> {
    (0..n).map(|i| HOURS_2020_01_01 + 24.0 * i as f64).collect()
}

/// Each cell value is `col * 1000 + row`, row-major.
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0);
/// assert_eq!(grid[10], 1.0);
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f64);
        }
    }
    data
}

/// Temperature-like values in Kelvin, 250K at the top-left rising to
/// about 310K at the bottom-right.
pub fn create_temperature_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let x_factor = col as f64 / width.max(1) as f64;
            let y_factor = row as f64 / height.max(1) as f64;
            data.push(250.0 + x_factor * 30.0 + y_factor * 30.0);
        }
    }
    data
}

/// A (time, latitude, longitude) dataset with a 2 m temperature variable
/// `t2m` and a constant `u10`.
pub fn era5_single_level(nlon: usize, nlat: usize, ntime: usize) -> MemoryDataset {
    let plane = create_temperature_grid(nlon, nlat);
    let t2m: Vec<f64> = (0..ntime)
        .flat_map(|t| plane.iter().map(move |v| v + t as f64))
        .collect();

    MemoryDataset::new()
        .with_dimension("longitude", nlon)
        .with_dimension("latitude", nlat)
        .with_dimension("time", ntime)
        .with_variable("longitude", &["longitude"], lon_axis(nlon))
        .and_then(|ds| ds.with_variable("latitude", &["latitude"], lat_axis(nlat)))
        .and_then(|ds| ds.with_variable("time", &["time"], daily_time_axis(ntime)))
        .and_then(|ds| ds.with_attribute("time", "units", "hours since 1900-01-01 00:00:00.0"))
        .and_then(|ds| ds.with_variable("t2m", &["time", "latitude", "longitude"], t2m))
        .and_then(|ds| ds.with_attribute("t2m", "units", "K"))
        .and_then(|ds| {
            ds.with_variable(
                "u10",
                &["time", "latitude", "longitude"],
                vec![1.0; ntime * nlat * nlon],
            )
        })
        .expect("synthetic single-level dataset is well formed")
}

/// A (time, level, lat, lon) dataset with geopotential `z`, using the
/// short `lon`/`lat` coordinate names. Each cell holds
/// `level_index * 100 + time_index`.
pub fn era5_pressure_levels(nlon: usize, nlat: usize, ntime: usize, levels: &[f64]) -> MemoryDataset {
    let nlev = levels.len();
    let mut z = Vec::with_capacity(ntime * nlev * nlat * nlon);
    for t in 0..ntime {
        for l in 0..nlev {
            z.extend(std::iter::repeat((l * 100 + t) as f64).take(nlat * nlon));
        }
    }

    MemoryDataset::new()
        .with_dimension("lon", nlon)
        .with_dimension("lat", nlat)
        .with_dimension("level", nlev)
        .with_dimension("time", ntime)
        .with_variable("lon", &["lon"], lon_axis(nlon))
        .and_then(|ds| ds.with_variable("lat", &["lat"], lat_axis(nlat)))
        .and_then(|ds| ds.with_variable("level", &["level"], levels.to_vec()))
        .and_then(|ds| ds.with_variable("time", &["time"], daily_time_axis(ntime)))
        .and_then(|ds| ds.with_variable("z", &["time", "level", "lat", "lon"], z))
        .expect("synthetic pressure-level dataset is well formed")
}
