//! Error types for option edits and preset storage.

use netcdf_parser::DatasetError;
use thiserror::Error;

/// Result type for option operations.
pub type OptionResult<T> = Result<T, OptionError>;

/// Result type for preset operations.
pub type PresetResult<T> = Result<T, PresetError>;

#[derive(Error, Debug)]
pub enum OptionError {
    /// Key outside the fixed option vocabulary
    #[error("Unknown option key: {0}")]
    UnknownKey(String),

    /// Value of the wrong kind for the key
    #[error("Option '{key}' expects {expected}, got {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: String,
    },

    /// Raw widget text that is not one of the offered choices
    #[error("Invalid choice '{value}' for option '{key}'")]
    InvalidChoice { key: String, value: String },

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl OptionError {
    pub(crate) fn invalid_choice(key: impl ToString, value: impl Into<String>) -> Self {
        Self::InvalidChoice {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum PresetError {
    #[error("Preset not found: {0}")]
    NotFound(String),

    #[error("Preset file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid preset document: {0}")]
    Json(#[from] serde_json::Error),
}
