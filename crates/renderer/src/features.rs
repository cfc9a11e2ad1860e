//! Coastline, country border and river decorations.
//!
//! Decorations are lon/lat polylines supplied by a [`FeatureSource`].
//! [`GeoJsonFeatures`] reads one GeoJSON file per kind and resolution,
//! named `<kind>_<res>.geojson` (e.g. `coastlines_i.geojson`).

use image::RgbaImage;
use imageproc::drawing::draw_line_segment_mut;
use projection::Projection;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use viewer_common::Resolution;

use crate::colormap::Color;
use crate::error::{RenderError, RenderResult};
use crate::view::MapView;

/// Sequence of (lon, lat) vertices in degrees.
pub type Polyline = Vec<(f64, f64)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Coastlines,
    Countries,
    Rivers,
}

impl FeatureKind {
    pub fn file_stem(&self) -> &'static str {
        match self {
            FeatureKind::Coastlines => "coastlines",
            FeatureKind::Countries => "countries",
            FeatureKind::Rivers => "rivers",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Supplier of decoration geometry.
pub trait FeatureSource {
    /// Polylines for `kind` at `resolution`. An empty list means there is
    /// nothing to draw.
    fn polylines(&self, kind: FeatureKind, resolution: Resolution) -> RenderResult<Vec<Polyline>>;
}

/// Draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeatures;

impl FeatureSource for NoFeatures {
    fn polylines(&self, _kind: FeatureKind, _resolution: Resolution) -> RenderResult<Vec<Polyline>> {
        Ok(Vec::new())
    }
}

/// Reads decorations from a directory of GeoJSON files.
#[derive(Debug, Clone)]
pub struct GeoJsonFeatures {
    dir: PathBuf,
}

impl GeoJsonFeatures {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, kind: FeatureKind, resolution: Resolution) -> PathBuf {
        self.dir
            .join(format!("{}_{}.geojson", kind.file_stem(), resolution.code()))
    }
}

impl FeatureSource for GeoJsonFeatures {
    fn polylines(&self, kind: FeatureKind, resolution: Resolution) -> RenderResult<Vec<Polyline>> {
        let path = self.path_for(kind, resolution);
        if !path.exists() {
            warn!(path = %path.display(), "Feature file not found, skipping {}", kind);
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&path)?;
        let document: GeoJson = serde_json::from_str(&content).map_err(|e| RenderError::Features {
            kind: kind.to_string(),
            message: format!("{}: {}", path.display(), e),
        })?;

        let mut lines = Vec::new();
        document.collect(&mut lines);
        debug!(kind = %kind, path = %path.display(), polylines = lines.len(), "Loaded features");
        Ok(lines)
    }
}

/// `[lon, lat]`, possibly followed by an elevation.
type Position = Vec<f64>;

/// The GeoJSON objects decorations are read from. Geometry without extent
/// (points) is accepted and ignored.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoJson {
    FeatureCollection { features: Vec<GeoJson> },
    Feature { geometry: Option<Box<GeoJson>> },
    GeometryCollection { geometries: Vec<GeoJson> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    #[serde(other)]
    Other,
}

impl GeoJson {
    fn collect(self, out: &mut Vec<Polyline>) {
        match self {
            GeoJson::FeatureCollection { features: items }
            | GeoJson::GeometryCollection { geometries: items } => {
                for item in items {
                    item.collect(out);
                }
            }
            GeoJson::Feature { geometry } => {
                if let Some(geometry) = geometry {
                    geometry.collect(out);
                }
            }
            GeoJson::LineString { coordinates } => out.extend(line(&coordinates)),
            GeoJson::MultiLineString { coordinates } | GeoJson::Polygon { coordinates } => {
                out.extend(coordinates.iter().filter_map(|ring| line(ring)));
            }
            GeoJson::MultiPolygon { coordinates } => {
                out.extend(coordinates.iter().flatten().filter_map(|ring| line(ring)));
            }
            GeoJson::Other => {}
        }
    }
}

/// Positions as a polyline; `None` when fewer than two are usable.
fn line(positions: &[Position]) -> Option<Polyline> {
    let points: Polyline = positions
        .iter()
        .filter_map(|p| Some((*p.first()?, *p.get(1)?)))
        .collect();
    (points.len() >= 2).then_some(points)
}

/// Draw polylines onto a view layer, breaking lines at unprojectable
/// vertices and at jumps wider than half the map (date-line wraps).
pub fn draw_polylines(
    layer: &mut RgbaImage,
    view: &MapView,
    projection: &Projection,
    polylines: &[Polyline],
    color: Color,
) {
    let rgba = color.to_rgba();
    let max_jump = view.extent().width() / 2.0;

    for polyline in polylines {
        let mut previous: Option<(f64, f64)> = None;
        for &(lon, lat) in polyline {
            let (x, y) = projection.forward(lon, lat);
            if !on_map(x, y) {
                previous = None;
                continue;
            }
            if let Some((px, py)) = previous {
                if (x - px).abs() <= max_jump {
                    let a = view.to_pixel(px, py);
                    let b = view.to_pixel(x, y);
                    draw_line_segment_mut(layer, (a.0 as f32, a.1 as f32), (b.0 as f32, b.1 as f32), rgba);
                }
            }
            previous = Some((x, y));
        }
    }
}

fn on_map(x: f64, y: f64) -> bool {
    x.is_finite() && y.is_finite() && x.abs() <= 1e20 && y.abs() <= 1e20
}
