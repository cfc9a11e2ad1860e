//! Map rasterization for reanalysis fields.
//!
//! Draws onto a caller-owned [`Canvas`]:
//! - Pseudocolor mesh over projected grid vertices
//! - Ocean fill and boundary clipping for the map outline
//! - Coastline, country and river decorations
//! - Vertical colorbar with under/over extensions
//!
//! Also provides the named colormaps, the linear and midpoint
//! normalizations, PNG encoding and preview-image rescaling.

pub mod canvas;
pub mod colorbar;
pub mod colormap;
pub mod config;
pub mod error;
pub mod features;
pub mod mesh;
pub mod norm;
pub mod png;
pub mod preview;
pub mod view;

pub use canvas::{Axes, Canvas};
pub use colorbar::draw_colorbar;
pub use colormap::{Color, Colormap, ColormapRegistry};
pub use config::RenderConfig;
pub use error::{RenderError, RenderResult};
pub use features::{draw_polylines, FeatureKind, FeatureSource, GeoJsonFeatures, NoFeatures, Polyline};
pub use mesh::{draw_pcolormesh, ProjectedMesh, OFF_MAP_THRESHOLD};
pub use norm::Normalization;
pub use png::encode_png;
pub use view::MapView;
