//! Map projections for global and regional reanalysis maps.
//!
//! A [`Projection`] is built from a flat keyword mapping (the same shape the
//! option panel and the preset file use) and maps longitude/latitude in
//! degrees to projected metres on a sphere.
//!
//! Supported projections are listed by [`ProjectionKind::all`]. Formulas are
//! the spherical forms; nothing here needs more than a few metres of accuracy.

pub mod azimuthal;
pub mod cylindrical;
pub mod error;
pub mod kind;
pub mod mollweide;
pub mod projection;
pub mod settings;

pub use azimuthal::UNPROJECTABLE;
pub use error::{ProjectionError, ProjectionResult};
pub use kind::ProjectionKind;
pub use projection::{Boundary, Projection, EARTH_RADIUS};
pub use settings::{MapSettings, ProjectionParams, KNOWN_KEYS};
