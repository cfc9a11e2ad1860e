//! Error types for figure construction.

use map_config::{OptionError, PlotType, PresetError};
use netcdf_parser::DatasetError;
use projection::ProjectionError;
use renderer::RenderError;
use thiserror::Error;

pub type FigureResult<T> = Result<T, FigureError>;

#[derive(Error, Debug)]
pub enum FigureError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Option(#[from] OptionError),

    #[error(transparent)]
    Preset(#[from] PresetError),

    #[error("Plot type '{0}' is not implemented")]
    UnsupportedPlotType(PlotType),

    /// A field the renderer needs has no value yet
    #[error("Option '{0}' is not set")]
    Unset(&'static str),

    #[error("Shape mismatch: {0}")]
    Shape(String),
}
