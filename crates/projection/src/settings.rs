//! Keyword settings that describe a map.
//!
//! Settings arrive as a flat keyword mapping, either assembled from the
//! option set or copied from a preset's stored arguments, e.g.
//! `{"projection": "cyl", "llcrnrlon": -15, ..., "resolution": "l"}`.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;
use viewer_common::{MapCorners, Resolution};

use crate::error::{ProjectionError, ProjectionResult};
use crate::kind::ProjectionKind;

/// Keyword name to value, in insertion order.
pub type MapSettings = IndexMap<String, Value>;

/// Keys understood by [`ProjectionParams::from_settings`].
pub const KNOWN_KEYS: [&str; 9] = [
    "projection",
    "resolution",
    "lon_0",
    "lat_0",
    "boundinglat",
    "llcrnrlon",
    "llcrnrlat",
    "urcrnrlon",
    "urcrnrlat",
];

const CORNER_KEYS: [&str; 4] = ["llcrnrlon", "llcrnrlat", "urcrnrlon", "urcrnrlat"];

/// Typed map parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionParams {
    pub kind: ProjectionKind,
    /// Central meridian in degrees.
    pub lon_0: f64,
    /// Latitude of the projection centre in degrees (orthographic only).
    pub lat_0: f64,
    /// Outermost latitude drawn by the polar stereographic projections.
    pub boundinglat: f64,
    pub corners: Option<MapCorners>,
    pub resolution: Resolution,
}

impl ProjectionParams {
    /// Parse keyword settings. Unknown keys are logged and ignored; a
    /// missing `projection` means `cyl`.
    pub fn from_settings(settings: &MapSettings) -> ProjectionResult<Self> {
        for key in settings.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                warn!(key = %key, "Ignoring unsupported map setting");
            }
        }

        let kind = match settings.get("projection") {
            Some(value) => text(value, "projection")?.parse::<ProjectionKind>()?,
            None => ProjectionKind::Cyl,
        };

        let resolution = match settings.get("resolution") {
            Some(Value::Null) | None => Resolution::default(),
            Some(value) => {
                text(value, "resolution")?
                    .parse::<Resolution>()
                    .map_err(|e| ProjectionError::InvalidSetting {
                        key: "resolution".to_string(),
                        message: e.to_string(),
                    })?
            }
        };

        let present: Vec<&str> = CORNER_KEYS
            .iter()
            .copied()
            .filter(|k| settings.contains_key(*k))
            .collect();
        let corners = match present.len() {
            0 => None,
            4 => Some(MapCorners::new(
                number(settings, "llcrnrlon")?.unwrap_or(-180.0),
                number(settings, "llcrnrlat")?.unwrap_or(-90.0),
                number(settings, "urcrnrlon")?.unwrap_or(180.0),
                number(settings, "urcrnrlat")?.unwrap_or(90.0),
            )),
            _ => {
                let missing = CORNER_KEYS
                    .iter()
                    .find(|k| !present.contains(k))
                    .copied()
                    .unwrap_or("llcrnrlon");
                return Err(ProjectionError::MissingSetting {
                    projection: kind.code().to_string(),
                    key: missing.to_string(),
                });
            }
        };

        if let Some(c) = &corners {
            if c.llcrnrlon >= c.urcrnrlon || c.llcrnrlat >= c.urcrnrlat {
                return Err(ProjectionError::InvalidSetting {
                    key: "llcrnrlon".to_string(),
                    message: format!(
                        "lower-left corner ({}, {}) must be below and left of upper-right ({}, {})",
                        c.llcrnrlon, c.llcrnrlat, c.urcrnrlon, c.urcrnrlat
                    ),
                });
            }
        }

        if let (ProjectionKind::Merc, Some(c)) = (kind, &corners) {
            for (key, lat) in [("llcrnrlat", c.llcrnrlat), ("urcrnrlat", c.urcrnrlat)] {
                if lat.abs() >= 90.0 {
                    return Err(ProjectionError::InvalidSetting {
                        key: key.to_string(),
                        message: format!("Mercator cannot reach latitude {}", lat),
                    });
                }
            }
        }

        // cylindrical maps cropped with corners are centred on them by default
        let lon_0 = match (number(settings, "lon_0")?, &corners) {
            (Some(lon_0), _) => lon_0,
            (None, Some(c)) => (c.llcrnrlon + c.urcrnrlon) / 2.0,
            (None, None) => 0.0,
        };
        let lat_0 = number(settings, "lat_0")?.unwrap_or(0.0);
        let boundinglat = number(settings, "boundinglat")?.unwrap_or(0.0);

        if !(-90.0..=90.0).contains(&lat_0) {
            return Err(ProjectionError::InvalidSetting {
                key: "lat_0".to_string(),
                message: format!("{} is outside [-90, 90]", lat_0),
            });
        }
        if boundinglat.abs() >= 90.0 {
            return Err(ProjectionError::InvalidSetting {
                key: "boundinglat".to_string(),
                message: format!("{} leaves nothing to draw", boundinglat),
            });
        }

        Ok(Self {
            kind,
            lon_0,
            lat_0,
            boundinglat,
            corners,
            resolution,
        })
    }
}

fn text<'a>(value: &'a Value, key: &str) -> ProjectionResult<&'a str> {
    value.as_str().ok_or_else(|| ProjectionError::InvalidSetting {
        key: key.to_string(),
        message: format!("expected a string, got {}", value),
    })
}

/// A numeric setting; numeric strings are accepted.
fn number(settings: &MapSettings, key: &str) -> ProjectionResult<Option<f64>> {
    let invalid = |value: &Value| ProjectionError::InvalidSetting {
        key: key.to_string(),
        message: format!("expected a number, got {}", value),
    };
    match settings.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| invalid(&Value::Number(n.clone()))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| invalid(&Value::String(s.clone()))),
        Some(other) => Err(invalid(other)),
    }
}
