use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Unknown projection: {0}")]
    UnknownProjection(String),

    #[error("Projection '{projection}' requires setting '{key}'")]
    MissingSetting { projection: String, key: String },

    #[error("Invalid value for '{key}': {message}")]
    InvalidSetting { key: String, message: String },
}

pub type ProjectionResult<T> = Result<T, ProjectionError>;
