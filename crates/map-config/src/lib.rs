//! Plotting option state for the reanalysis viewer.
//!
//! - [`OptionSet`]: the typed option record handed to the renderer
//! - [`OptionPanel`]: choice lists and per-field edit handlers that turn raw
//!   widget text into option updates
//! - [`PresetRegistry`]: named projection argument bundles persisted as JSON

pub mod error;
pub mod options;
pub mod panel;
pub mod presets;

pub use error::{OptionError, OptionResult, PresetError, PresetResult};
pub use options::{init_defaults, OptionKey, OptionSet, OptionValue, PlotType};
pub use panel::{Choices, Control, Effect, OptionPanel, NO_PRESET};
pub use presets::{preset_name_from_filename, PresetEntry, PresetRegistry};
