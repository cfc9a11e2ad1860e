//! Common types and utilities shared across the reanalysis viewer crates.

pub mod bbox;
pub mod resolution;
pub mod time;

pub use bbox::{BoundingBox, MapCorners};
pub use resolution::Resolution;
pub use time::{TimeUnit, TimeUnits};
