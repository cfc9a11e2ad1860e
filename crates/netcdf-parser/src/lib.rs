//! NetCDF dataset access for climate-reanalysis files.
//!
//! This crate provides read-only access to gridded reanalysis datasets
//! (ERA5 style: `time`, optional `level`, `latitude`, `longitude`) behind the
//! [`Dataset`] trait, plus the metadata extraction used to populate the
//! viewer's choice lists.
//!
//! # Implementation Notes
//!
//! [`NetCdfDataset`] wraps the `netcdf` crate (libnetcdf/HDF5). Tests and
//! tooling use [`MemoryDataset`], which implements the same trait without
//! touching the filesystem.

pub mod axes;
pub mod dataset;
pub mod error;
pub mod memory;
pub mod metadata;
pub mod native;
pub mod slice;

pub use axes::{
    has_pressure_levels, list_pressure_levels, list_timesteps, read_coordinates, Coordinates,
    PressureLevel, Timestep, Timesteps, COORDINATE_NAMES, LEVEL_NAMES, TIME_NAMES,
};
pub use dataset::{AttrValue, Dataset, VariableMeta};
pub use error::{DatasetError, DatasetResult};
pub use memory::MemoryDataset;
pub use metadata::{extract, list_plottable_variables, MetadataSnapshot};
pub use native::{open, silence_hdf5_errors, NetCdfDataset};
pub use slice::{read_slice, Grid2D};
