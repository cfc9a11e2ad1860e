//! Time axis decoding for reanalysis datasets.
//!
//! Time coordinates are stored as numeric offsets from an epoch. When the
//! variable carries a CF `units` attribute ("hours since 1900-01-01 00:00:00.0")
//! it is honoured; otherwise offsets are hours since 1900-01-01.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Unit of a numeric time offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn seconds(&self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Minutes => 60.0,
            TimeUnit::Hours => 3600.0,
            TimeUnit::Days => 86400.0,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Some(TimeUnit::Seconds),
            "min" | "mins" | "minute" | "minutes" => Some(TimeUnit::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(TimeUnit::Hours),
            "d" | "day" | "days" => Some(TimeUnit::Days),
            _ => None,
        }
    }
}

/// Offset unit plus epoch, e.g. "hours since 1900-01-01".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeUnits {
    pub unit: TimeUnit,
    pub epoch: NaiveDateTime,
}

// Offsets beyond this many milliseconds are rejected instead of overflowing.
const MAX_OFFSET_MS: f64 = 1.0e15;

impl TimeUnits {
    /// Hours since 1900-01-01T00:00:00, the reanalysis convention.
    pub fn reanalysis_default() -> Self {
        Self {
            unit: TimeUnit::Hours,
            epoch: NaiveDate::from_ymd_opt(1900, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
        }
    }

    /// Parse a CF units string of the form `<unit> since <date>[ <time>]`.
    pub fn parse(s: &str) -> Result<Self, TimeParseError> {
        let (unit, epoch) = s
            .split_once(" since ")
            .ok_or_else(|| TimeParseError::InvalidFormat(s.to_string()))?;
        let unit = TimeUnit::parse(unit.trim())
            .ok_or_else(|| TimeParseError::UnknownUnit(unit.trim().to_string()))?;
        let epoch = parse_epoch(epoch.trim())
            .ok_or_else(|| TimeParseError::InvalidFormat(s.to_string()))?;
        Ok(Self { unit, epoch })
    }

    /// Decode a numeric offset into a timestamp.
    pub fn decode(&self, offset: f64) -> Option<NaiveDateTime> {
        let ms = offset * self.unit.seconds() * 1000.0;
        if !ms.is_finite() || ms.abs() > MAX_OFFSET_MS {
            return None;
        }
        self.epoch
            .checked_add_signed(Duration::milliseconds(ms.round() as i64))
    }

    /// Decode a numeric offset, truncated to the whole day.
    pub fn decode_date(&self, offset: f64) -> Option<NaiveDate> {
        self.decode(offset).map(|dt| dt.date())
    }
}

impl Default for TimeUnits {
    fn default() -> Self {
        Self::reanalysis_default()
    }
}

fn parse_epoch(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim_end_matches(" UTC").trim_end_matches('Z').trim();

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid time units: {0}")]
    InvalidFormat(String),

    #[error("Unknown time unit: {0}")]
    UnknownUnit(String),
}
