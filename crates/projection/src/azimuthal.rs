//! Azimuthal projections: orthographic and polar stereographic.

use std::f64::consts::FRAC_PI_4;

/// Coordinate returned for points the projection cannot show (the far
/// hemisphere of an orthographic view). Callers treat anything above
/// 1e20 in magnitude as off the map.
pub const UNPROJECTABLE: f64 = 1e30;

/// Orthographic view centred on (`lam` = 0, `phi0`).
pub fn orthographic(lam: f64, phi: f64, phi0: f64, r: f64) -> (f64, f64) {
    let cos_c = phi0.sin() * phi.sin() + phi0.cos() * phi.cos() * lam.cos();
    if cos_c < 0.0 {
        return (UNPROJECTABLE, UNPROJECTABLE);
    }
    let x = r * phi.cos() * lam.sin();
    let y = r * (phi0.cos() * phi.sin() - phi0.sin() * phi.cos() * lam.cos());
    (x, y)
}

/// North polar stereographic; the central meridian points down from the
/// pole.
pub fn north_polar_stereographic(lam: f64, phi: f64, r: f64) -> (f64, f64) {
    let rho = 2.0 * r * (FRAC_PI_4 - phi / 2.0).tan();
    (rho * lam.sin(), -rho * lam.cos())
}

/// South polar stereographic; the central meridian points up from the
/// pole.
pub fn south_polar_stereographic(lam: f64, phi: f64, r: f64) -> (f64, f64) {
    let rho = 2.0 * r * (FRAC_PI_4 + phi / 2.0).tan();
    (rho * lam.sin(), rho * lam.cos())
}

/// Distance from the pole to the bounding latitude circle.
pub fn polar_radius(boundinglat: f64, r: f64) -> f64 {
    2.0 * r * (FRAC_PI_4 - boundinglat.abs() / 2.0).tan()
}
