//! Error types for dataset access.

use thiserror::Error;

/// Result type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Error types for dataset access.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file could not be opened as a netCDF dataset
    #[error("Failed to open dataset '{path}': {message}")]
    Open { path: String, message: String },

    /// An expected coordinate or level axis is absent
    #[error("Missing axis: {0}")]
    MissingAxis(String),

    /// A named variable is absent
    #[error("Missing variable: {0}")]
    MissingVariable(String),

    /// The underlying library failed while reading values or attributes
    #[error("Failed to read '{name}': {message}")]
    Read { name: String, message: String },

    /// An index is outside the extent of its dimension
    #[error("Index {index} out of range for dimension '{dimension}' of length {len}")]
    IndexOutOfRange {
        dimension: String,
        index: usize,
        len: usize,
    },

    /// Data does not have the shape the caller expects
    #[error("Invalid shape: {0}")]
    InvalidShape(String),
}

impl DatasetError {
    /// Create a Read error.
    pub fn read(name: impl Into<String>, message: impl ToString) -> Self {
        Self::Read {
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// True for errors that mean the dataset lacks an expected structure.
    pub fn is_structure_error(&self) -> bool {
        matches!(
            self,
            DatasetError::MissingAxis(_) | DatasetError::MissingVariable(_) | DatasetError::InvalidShape(_)
        )
    }
}
