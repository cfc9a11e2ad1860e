//! Cylindrical projections: equidistant, Mercator and Miller.
//!
//! All functions take the longitude relative to the central meridian and
//! the latitude, both in radians, and return metres on a sphere of radius
//! `r`.

use std::f64::consts::FRAC_PI_4;

pub fn equidistant(lam: f64, phi: f64, r: f64) -> (f64, f64) {
    (r * lam, r * phi)
}

/// Mercator. Poles map to infinity.
pub fn mercator(lam: f64, phi: f64, r: f64) -> (f64, f64) {
    (r * lam, r * (FRAC_PI_4 + phi / 2.0).tan().ln())
}

/// Miller cylindrical: Mercator with latitudes scaled by 4/5, finite at
/// the poles.
pub fn miller(lam: f64, phi: f64, r: f64) -> (f64, f64) {
    (r * lam, 1.25 * r * (FRAC_PI_4 + 0.4 * phi).tan().ln())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_equidistant_is_linear() {
        let (x, y) = equidistant(FRAC_PI_2, FRAC_PI_4, 1.0);
        assert!((x - FRAC_PI_2).abs() < 1e-12);
        assert!((y - FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn test_mercator_equator_and_symmetry() {
        let (_, y0) = mercator(0.0, 0.0, 1.0);
        assert!(y0.abs() < 1e-12);
        let (_, yn) = mercator(0.0, 0.5, 1.0);
        let (_, ys) = mercator(0.0, -0.5, 1.0);
        assert!((yn + ys).abs() < 1e-12);
    }

    #[test]
    fn test_miller_pole_is_finite() {
        let (_, y) = miller(PI, FRAC_PI_2, 1.0);
        assert!(y.is_finite());
        // 1.25 * ln(tan(pi/4 + 0.2 pi)) = 1.25 * ln(tan(0.45 pi))
        assert!((y - 1.25 * (0.45 * PI).tan().ln()).abs() < 1e-12);
    }
}
