//! Coastline and boundary resolution levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resolution of the coastline, country and river datasets drawn on a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "c")]
    Crude,
    #[serde(rename = "l")]
    Low,
    #[serde(rename = "i")]
    Intermediate,
    #[serde(rename = "h")]
    High,
    #[serde(rename = "f")]
    Full,
}

impl Resolution {
    /// Single-letter code used in option files and feature file names.
    pub fn code(&self) -> &'static str {
        match self {
            Resolution::Crude => "c",
            Resolution::Low => "l",
            Resolution::Intermediate => "i",
            Resolution::High => "h",
            Resolution::Full => "f",
        }
    }

    /// All resolutions, coarsest first.
    pub fn all() -> &'static [Resolution] {
        &[
            Resolution::Crude,
            Resolution::Low,
            Resolution::Intermediate,
            Resolution::High,
            Resolution::Full,
        ]
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::Intermediate
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid resolution '{0}'. Expected one of c, l, i, h, f")]
pub struct ParseResolutionError(pub String);

impl FromStr for Resolution {
    type Err = ParseResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "c" => Ok(Resolution::Crude),
            "l" => Ok(Resolution::Low),
            "i" => Ok(Resolution::Intermediate),
            "h" => Ok(Resolution::High),
            "f" => Ok(Resolution::Full),
            other => Err(ParseResolutionError(other.to_string())),
        }
    }
}
