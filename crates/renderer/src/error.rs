use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid normalization: {0}")]
    InvalidNormalization(String),

    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),

    #[error("Failed to load {kind} features: {message}")]
    Features { kind: String, message: String },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
