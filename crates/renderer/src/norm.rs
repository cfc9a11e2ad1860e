//! Mapping data values to colormap fractions.

use crate::error::{RenderError, RenderResult};

/// How data values become colormap fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalization {
    /// `(v - vmin) / (vmax - vmin)`, not clipped; values outside the range
    /// land below 0 or above 1 and take the under/over colours.
    Linear { vmin: f64, vmax: f64 },
    /// Piecewise linear through `(vmin, 0)`, `(midpoint, 0.5)`,
    /// `(vmax, 1)`, clamped outside the range.
    Midpoint { vmin: f64, midpoint: f64, vmax: f64 },
}

impl Normalization {
    pub fn linear(vmin: f64, vmax: f64) -> Self {
        Normalization::Linear { vmin, vmax }
    }

    /// Linear scaling over the finite minimum and maximum of `values`.
    /// Falls back to [0, 1] when nothing is finite.
    pub fn linear_from_data(values: &[f64]) -> Self {
        let range = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            });
        let (vmin, vmax) = range.unwrap_or((0.0, 1.0));
        Normalization::Linear { vmin, vmax }
    }

    /// Midpoint-centred normalization. Requires finite bounds with
    /// `vmin < midpoint < vmax`.
    pub fn midpoint(vmin: f64, midpoint: f64, vmax: f64) -> RenderResult<Self> {
        if !(vmin.is_finite() && midpoint.is_finite() && vmax.is_finite()) {
            return Err(RenderError::InvalidNormalization(format!(
                "bounds must be finite, got c_min={}, midpoint={}, c_max={}",
                vmin, midpoint, vmax
            )));
        }
        if !(vmin < midpoint && midpoint < vmax) {
            return Err(RenderError::InvalidNormalization(format!(
                "expected c_min < midpoint < c_max, got {} / {} / {}",
                vmin, midpoint, vmax
            )));
        }
        Ok(Normalization::Midpoint {
            vmin,
            midpoint,
            vmax,
        })
    }

    /// Fraction for `value`; NaN stays NaN.
    pub fn apply(&self, value: f64) -> f64 {
        if value.is_nan() {
            return f64::NAN;
        }
        match *self {
            Normalization::Linear { vmin, vmax } => {
                if vmax == vmin {
                    0.0
                } else {
                    (value - vmin) / (vmax - vmin)
                }
            }
            Normalization::Midpoint {
                vmin,
                midpoint,
                vmax,
            } => {
                if value <= vmin {
                    0.0
                } else if value >= vmax {
                    1.0
                } else if value <= midpoint {
                    0.5 * (value - vmin) / (midpoint - vmin)
                } else {
                    0.5 + 0.5 * (value - midpoint) / (vmax - midpoint)
                }
            }
        }
    }

    pub fn vmin(&self) -> f64 {
        match *self {
            Normalization::Linear { vmin, .. } | Normalization::Midpoint { vmin, .. } => vmin,
        }
    }

    pub fn vmax(&self) -> f64 {
        match *self {
            Normalization::Linear { vmax, .. } | Normalization::Midpoint { vmax, .. } => vmax,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_midpoint_control_points() {
        let norm = Normalization::midpoint(0.0, 25.0, 50.0).unwrap();
        assert_relative_eq!(norm.apply(0.0), 0.0);
        assert_relative_eq!(norm.apply(25.0), 0.5);
        assert_relative_eq!(norm.apply(50.0), 1.0);
        assert_relative_eq!(norm.apply(12.5), 0.25);
        assert_relative_eq!(norm.apply(37.5), 0.75);
    }

    #[test]
    fn test_midpoint_asymmetric_bounds() {
        let norm = Normalization::midpoint(-10.0, 0.0, 40.0).unwrap();
        assert_relative_eq!(norm.apply(-5.0), 0.25);
        assert_relative_eq!(norm.apply(20.0), 0.75);
    }

    #[test]
    fn test_midpoint_clamps_outside() {
        let norm = Normalization::midpoint(0.0, 25.0, 50.0).unwrap();
        assert_eq!(norm.apply(-100.0), 0.0);
        assert_eq!(norm.apply(100.0), 1.0);
        assert!(norm.apply(f64::NAN).is_nan());
    }

    #[test]
    fn test_midpoint_rejects_bad_ordering() {
        assert!(Normalization::midpoint(0.0, 60.0, 50.0).is_err());
        assert!(Normalization::midpoint(0.0, 0.0, 50.0).is_err());
        assert!(Normalization::midpoint(f64::NAN, 1.0, 2.0).is_err());
    }

    #[test]
    fn test_linear_from_data_ignores_nan() {
        let norm = Normalization::linear_from_data(&[f64::NAN, 2.0, 4.0, 6.0]);
        assert_eq!((norm.vmin(), norm.vmax()), (2.0, 6.0));
        assert_relative_eq!(norm.apply(4.0), 0.5);
        assert!(norm.apply(8.0) > 1.0);
    }

    #[test]
    fn test_linear_constant_field() {
        let norm = Normalization::linear_from_data(&[3.0, 3.0]);
        assert_eq!(norm.apply(3.0), 0.0);
    }
}
