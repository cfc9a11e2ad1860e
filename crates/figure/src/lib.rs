//! Map figure construction.
//!
//! Turns (dataset, option snapshot, presets) into drawing on a caller-owned
//! canvas:
//!
//! 1. Resolve keyword map settings, directly from the options or from a preset
//! 2. Build the projection; fill the map background and draw decorations
//! 3. Read longitude/latitude and the requested 2-D slice
//! 4. Correct values, shift longitudes and swap longitude halves
//! 5. Project the coordinate mesh, masking the hidden orthographic hemisphere
//! 6. Draw the pseudocolor mesh and, when asked, the colorbar
//!
//! Nothing is retained between renders.

pub mod error;
pub mod figure;
pub mod settings;
pub mod transform;

pub use error::{FigureError, FigureResult};
pub use figure::{Figure, FigureContext, RenderSummary};
pub use settings::resolve_map_settings;
pub use transform::{
    apply_correction, mask_out_of_domain, offset_longitudes, project_mesh, swap_longitude_halves,
    SENTINEL,
};
