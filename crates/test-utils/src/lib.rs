//! Fixtures and helpers shared by the workspace's tests.
//!
//! Synthetic ERA5-shaped datasets live in [`generators`], preset documents
//! and small file writers in [`fixtures`], and sample-file lookup in
//! [`paths`].

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Resolve a netCDF sample by file name, or end the calling test early.
///
/// Real reanalysis files are not checked in. A test written as
/// `let path = require_test_file!("era5_sample.nc");` passes without
/// asserting anything when the sample cannot be found.
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!("skipping: sample '{}' is not available (see TEST_DATA_DIR)", $name);
                return;
            }
        }
    }};
}

/// Compare decoded grid values against expectations within `tol`.
///
/// `NaN` marks a masked or missing cell and only matches `NaN`.
#[macro_export]
macro_rules! assert_cells_close {
    ($actual:expr, $expected:expr, $tol:expr) => {{
        let actual: &[f64] = &$actual;
        let expected: &[f64] = &$expected;
        assert_eq!(actual.len(), expected.len(), "cell count differs");
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            let same = if e.is_nan() {
                a.is_nan()
            } else {
                (a - e).abs() <= $tol
            };
            assert!(same, "cell {}: got {}, expected {}", i, a, e);
        }
    }};
}
