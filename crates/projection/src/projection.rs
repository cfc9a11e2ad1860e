//! A constructed map projection.

use std::f64::consts::PI;
use tracing::debug;
use viewer_common::{BoundingBox, Resolution};

use crate::azimuthal::{self, polar_radius};
use crate::cylindrical;
use crate::error::ProjectionResult;
use crate::kind::ProjectionKind;
use crate::mollweide;
use crate::settings::{MapSettings, ProjectionParams};

/// Sphere radius in metres.
pub const EARTH_RADIUS: f64 = 6_370_997.0;

// default latitude limit of an uncropped Mercator map
const MERCATOR_LAT_LIMIT: f64 = 80.0;

/// Outline of the drawable map area in projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Boundary {
    Rectangle(BoundingBox),
    /// Ellipse centred on the origin; a circle when both semi-axes match.
    Ellipse { rx: f64, ry: f64 },
}

impl Boundary {
    /// Closed outline as a polygon (first vertex not repeated).
    pub fn polygon(&self, segments: usize) -> Vec<(f64, f64)> {
        match self {
            Boundary::Rectangle(b) => vec![
                (b.min_x, b.min_y),
                (b.max_x, b.min_y),
                (b.max_x, b.max_y),
                (b.min_x, b.max_y),
            ],
            Boundary::Ellipse { rx, ry } => {
                let n = segments.max(8);
                (0..n)
                    .map(|i| {
                        let t = 2.0 * PI * i as f64 / n as f64;
                        (rx * t.cos(), ry * t.sin())
                    })
                    .collect()
            }
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        match self {
            Boundary::Rectangle(b) => b.contains_point(x, y),
            Boundary::Ellipse { rx, ry } => (x / rx).powi(2) + (y / ry).powi(2) <= 1.0,
        }
    }
}

/// Map projection plus the extent and outline of the map it draws.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    params: ProjectionParams,
    extent: BoundingBox,
    boundary: Boundary,
}

impl Projection {
    /// Build a projection from keyword settings.
    pub fn from_settings(settings: &MapSettings) -> ProjectionResult<Self> {
        Ok(Self::new(ProjectionParams::from_settings(settings)?))
    }

    pub fn new(params: ProjectionParams) -> Self {
        let (extent, boundary) = Self::layout(&params);
        debug!(
            projection = params.kind.code(),
            lon_0 = params.lon_0,
            lat_0 = params.lat_0,
            min_x = extent.min_x,
            max_x = extent.max_x,
            min_y = extent.min_y,
            max_y = extent.max_y,
            "Constructed projection"
        );
        Self {
            params,
            extent,
            boundary,
        }
    }

    fn layout(params: &ProjectionParams) -> (BoundingBox, Boundary) {
        let r = EARTH_RADIUS;
        let kind = params.kind;
        match kind {
            ProjectionKind::Cyl | ProjectionKind::Merc | ProjectionKind::Mill => {
                let (west, south, east, north) = match &params.corners {
                    Some(c) => (c.llcrnrlon, c.llcrnrlat, c.urcrnrlon, c.urcrnrlat),
                    None if kind == ProjectionKind::Merc => (
                        params.lon_0 - 180.0,
                        -MERCATOR_LAT_LIMIT,
                        params.lon_0 + 180.0,
                        MERCATOR_LAT_LIMIT,
                    ),
                    None => (params.lon_0 - 180.0, -90.0, params.lon_0 + 180.0, 90.0),
                };
                // corner longitudes are not wrapped, so a full 360 span stays full
                let x0 = r * (west - params.lon_0).to_radians();
                let x1 = r * (east - params.lon_0).to_radians();
                let (_, y0) = Self::cylindrical(kind, 0.0, south.to_radians(), r);
                let (_, y1) = Self::cylindrical(kind, 0.0, north.to_radians(), r);
                let extent = BoundingBox::new(x0, y0, x1, y1);
                (extent, Boundary::Rectangle(extent))
            }
            ProjectionKind::Moll => {
                let (rx, ry) = mollweide::semi_axes(r);
                (BoundingBox::new(-rx, -ry, rx, ry), Boundary::Ellipse { rx, ry })
            }
            ProjectionKind::Ortho => (
                BoundingBox::new(-r, -r, r, r),
                Boundary::Ellipse { rx: r, ry: r },
            ),
            ProjectionKind::Npstere | ProjectionKind::Spstere => {
                let rho = polar_radius(params.boundinglat.to_radians(), r);
                let extent = BoundingBox::new(-rho, -rho, rho, rho);
                (extent, Boundary::Rectangle(extent))
            }
        }
    }

    fn cylindrical(kind: ProjectionKind, lam: f64, phi: f64, r: f64) -> (f64, f64) {
        match kind {
            ProjectionKind::Merc => cylindrical::mercator(lam, phi, r),
            ProjectionKind::Mill => cylindrical::miller(lam, phi, r),
            _ => cylindrical::equidistant(lam, phi, r),
        }
    }

    /// Project a longitude/latitude pair in degrees to map metres.
    ///
    /// Non-finite input gives non-finite output. Points on the hidden
    /// hemisphere of an orthographic view give [`azimuthal::UNPROJECTABLE`].
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        if !lon.is_finite() || !lat.is_finite() {
            return (f64::NAN, f64::NAN);
        }
        let r = EARTH_RADIUS;
        let lam = self.relative_longitude(lon).to_radians();
        let phi = lat.clamp(-90.0, 90.0).to_radians();

        match self.params.kind {
            kind @ (ProjectionKind::Cyl | ProjectionKind::Merc | ProjectionKind::Mill) => {
                Self::cylindrical(kind, lam, phi, r)
            }
            ProjectionKind::Moll => mollweide::forward(lam, phi, r),
            ProjectionKind::Ortho => {
                azimuthal::orthographic(lam, phi, self.params.lat_0.to_radians(), r)
            }
            ProjectionKind::Npstere => azimuthal::north_polar_stereographic(lam, phi, r),
            ProjectionKind::Spstere => azimuthal::south_polar_stereographic(lam, phi, r),
        }
    }

    /// Longitude relative to the central meridian, wrapped into the map's
    /// horizontal range.
    fn relative_longitude(&self, lon: f64) -> f64 {
        let mut rel = (lon - self.params.lon_0).rem_euclid(360.0);
        if rel >= 180.0 {
            rel -= 360.0;
        }
        // a cropped cylindrical map may reach past +-180 from lon_0
        if let (true, Some(c)) = (self.is_cylindrical(), &self.params.corners) {
            let east = c.urcrnrlon - self.params.lon_0;
            let west = c.llcrnrlon - self.params.lon_0;
            if rel < west && rel + 360.0 <= east {
                rel += 360.0;
            } else if rel > east && rel - 360.0 >= west {
                rel -= 360.0;
            }
        }
        rel
    }

    fn is_cylindrical(&self) -> bool {
        matches!(
            self.params.kind,
            ProjectionKind::Cyl | ProjectionKind::Merc | ProjectionKind::Mill
        )
    }

    pub fn kind(&self) -> ProjectionKind {
        self.params.kind
    }

    pub fn params(&self) -> &ProjectionParams {
        &self.params
    }

    pub fn resolution(&self) -> Resolution {
        self.params.resolution
    }

    /// Projected extent of the map.
    pub fn extent(&self) -> BoundingBox {
        self.extent
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }
}
