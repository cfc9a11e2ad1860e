//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A projected bounding box, in projection units (meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box containing every finite point. `None` if there is no finite point.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut bbox: Option<BoundingBox> = None;
        for (x, y) in points {
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            bbox = Some(match bbox {
                None => BoundingBox::new(x, y, x, y),
                Some(b) => BoundingBox::new(b.min_x.min(x), b.min_y.min(y), b.max_x.max(x), b.max_y.max(y)),
            });
        }
        bbox
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Width over height; 1.0 for a degenerate box.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height() <= 0.0 || self.width() <= 0.0 {
            return 1.0;
        }
        self.width() / self.height()
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Geographic corners of a limited map view, in degrees.
///
/// Field names follow the projection keywords they are read from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCorners {
    pub llcrnrlon: f64,
    pub llcrnrlat: f64,
    pub urcrnrlon: f64,
    pub urcrnrlat: f64,
}

impl MapCorners {
    pub fn new(llcrnrlon: f64, llcrnrlat: f64, urcrnrlon: f64, urcrnrlat: f64) -> Self {
        Self {
            llcrnrlon,
            llcrnrlat,
            urcrnrlon,
            urcrnrlat,
        }
    }

    /// The whole globe, the default corners offered to the user.
    pub fn global() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    /// The four corners as (lon, lat) pairs, counter-clockwise from lower left.
    pub fn points(&self) -> [(f64, f64); 4] {
        [
            (self.llcrnrlon, self.llcrnrlat),
            (self.urcrnrlon, self.llcrnrlat),
            (self.urcrnrlon, self.urcrnrlat),
            (self.llcrnrlon, self.urcrnrlat),
        ]
    }
}

impl Default for MapCorners {
    fn default() -> Self {
        Self::global()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_skips_non_finite() {
        let bbox = BoundingBox::from_points(vec![
            (1.0, 2.0),
            (f64::NAN, 100.0),
            (-3.0, 5.0),
            (f64::INFINITY, 0.0),
        ])
        .unwrap();
        assert_eq!(bbox, BoundingBox::new(-3.0, 2.0, 1.0, 5.0));
    }

    #[test]
    fn test_from_points_empty() {
        assert!(BoundingBox::from_points(Vec::new()).is_none());
    }
}
