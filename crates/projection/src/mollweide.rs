//! Mollweide equal-area projection.

use std::f64::consts::{FRAC_PI_2, PI, SQRT_2};

const MAX_ITERATIONS: usize = 50;
const TOLERANCE: f64 = 1e-12;

/// Auxiliary angle θ solving `2θ + sin 2θ = π sin φ` by Newton iteration.
fn auxiliary_angle(phi: f64) -> f64 {
    if (phi.abs() - FRAC_PI_2).abs() < TOLERANCE {
        return phi.signum() * FRAC_PI_2;
    }

    let target = PI * phi.sin();
    // iterate on t = 2θ
    let mut t = phi;
    for _ in 0..MAX_ITERATIONS {
        let delta = (t + t.sin() - target) / (1.0 + t.cos());
        t -= delta;
        if delta.abs() < TOLERANCE {
            break;
        }
    }
    t / 2.0
}

/// Project relative longitude `lam` and latitude `phi` (radians).
pub fn forward(lam: f64, phi: f64, r: f64) -> (f64, f64) {
    let theta = auxiliary_angle(phi);
    let x = 2.0 * SQRT_2 / PI * r * lam * theta.cos();
    let y = SQRT_2 * r * theta.sin();
    (x, y)
}

/// Semi-axes of the ellipse that bounds the map.
pub fn semi_axes(r: f64) -> (f64, f64) {
    (2.0 * SQRT_2 * r, SQRT_2 * r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin() {
        let (x, y) = forward(0.0, 0.0, 1.0);
        assert!(x.abs() < 1e-12 && y.abs() < 1e-12);
    }

    #[test]
    fn test_equator_edge_and_pole() {
        let (rx, ry) = semi_axes(1.0);
        let (x, _) = forward(PI, 0.0, 1.0);
        assert!((x - rx).abs() < 1e-9, "equator edge should reach the semi-major axis, got {}", x);
        let (x, y) = forward(1.0, FRAC_PI_2, 1.0);
        assert!(x.abs() < 1e-9);
        assert!((y - ry).abs() < 1e-9);
    }

    #[test]
    fn test_auxiliary_angle_satisfies_equation() {
        for deg in [-80.0_f64, -45.0, -10.0, 5.0, 30.0, 60.0, 89.0] {
            let phi = deg.to_radians();
            let theta = auxiliary_angle(phi);
            let residual = 2.0 * theta + (2.0 * theta).sin() - PI * phi.sin();
            assert!(residual.abs() < 1e-9, "residual {} at {} deg", residual, deg);
        }
    }
}
