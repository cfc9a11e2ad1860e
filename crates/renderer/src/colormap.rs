//! Named colormaps.
//!
//! A colormap maps a fraction in [0, 1] to a colour by linear interpolation
//! between colour stops. The registry holds the built-in maps, each with a
//! reversed `_r` twin, and can be extended from a JSON stop file:
//!
//! ```json
//! { "anomaly": [ {"value": -5, "color": "#2166ac"}, {"value": 5, "color": "#b2182b"} ] }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{RenderError, RenderResult};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// Parse `#rrggbb` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        hex_to_rgb(hex).map(|(r, g, b)| Color::rgb(r, g, b))
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    let mix = |a: u8, b: u8| ((a as f32 * t_inv) + (b as f32 * t)).round() as u8;

    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// Color stop as written in a colormap file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColorStop {
    pub value: f32,
    pub color: String,
}

/// A sequence of colour stops over [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    stops: Vec<(f32, Color)>,
}

impl Colormap {
    /// Build from stops at arbitrary positions; positions are rescaled to
    /// [0, 1]. Needs at least one stop.
    pub fn new(name: &str, mut stops: Vec<(f32, Color)>) -> RenderResult<Self> {
        if stops.is_empty() {
            return Err(RenderError::UnknownColormap(format!("{} has no colour stops", name)));
        }
        stops.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        let lo = stops[0].0;
        let hi = stops[stops.len() - 1].0;
        let span = if hi > lo { hi - lo } else { 1.0 };
        let stops = stops
            .into_iter()
            .map(|(v, c)| ((v - lo) / span, c))
            .collect();
        Ok(Self {
            name: name.to_string(),
            stops,
        })
    }

    /// Stops spaced evenly from 0 to 1.
    fn evenly_spaced(name: &str, colors: &[Color]) -> Self {
        let n = colors.len().max(2) - 1;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, &c)| (i as f32 / n as f32, c))
            .collect();
        Self {
            name: name.to_string(),
            stops,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Colour at fraction `t`, clamped to the ends.
    pub fn at(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) as f32 };
        let first = self.stops[0];
        if t <= first.0 {
            return first.1;
        }
        for pair in self.stops.windows(2) {
            let (v0, c0) = pair[0];
            let (v1, c1) = pair[1];
            if t <= v1 {
                let span = v1 - v0;
                let local = if span > 0.0 { (t - v0) / span } else { 1.0 };
                return interpolate_color(c0, c1, local);
            }
        }
        self.stops[self.stops.len() - 1].1
    }

    /// Colour for values below the normalization range.
    pub fn under(&self) -> Color {
        self.at(0.0)
    }

    /// Colour for values above the normalization range.
    pub fn over(&self) -> Color {
        self.at(1.0)
    }

    pub fn reversed(&self) -> Self {
        let name = match self.name.strip_suffix("_r") {
            Some(base) => base.to_string(),
            None => format!("{}_r", self.name),
        };
        let stops = self
            .stops
            .iter()
            .rev()
            .map(|&(v, c)| (1.0 - v, c))
            .collect();
        Self { name, stops }
    }
}

fn hex_list(name: &str, hexes: &[&str]) -> Colormap {
    let colors: Vec<Color> = hexes.iter().filter_map(|h| Color::from_hex(h)).collect();
    Colormap::evenly_spaced(name, &colors)
}

fn hex_stops(name: &str, stops: &[(f32, &str)]) -> Colormap {
    let stops = stops
        .iter()
        .filter_map(|&(v, h)| Color::from_hex(h).map(|c| (v, c)))
        .collect();
    Colormap {
        name: name.to_string(),
        stops,
    }
}

fn builtin_colormaps() -> Vec<Colormap> {
    vec![
        hex_stops(
            "seismic",
            &[(0.0, "#00004c"), (0.25, "#0000ff"), (0.5, "#ffffff"), (0.75, "#ff0000"), (1.0, "#800000")],
        ),
        hex_list("bwr", &["#0000ff", "#ffffff", "#ff0000"]),
        hex_list("coolwarm", &["#3b4cc0", "#8db0fe", "#dddddd", "#f49a7b", "#b40426"]),
        hex_list(
            "RdBu",
            &[
                "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7", "#f7f7f7", "#d1e5f0",
                "#92c5de", "#4393c3", "#2166ac", "#053061",
            ],
        ),
        hex_list(
            "viridis",
            &[
                "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779",
                "#6ece58", "#b5de2b", "#fde725",
            ],
        ),
        hex_list(
            "plasma",
            &[
                "#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786", "#d8576b", "#ed7953",
                "#fb9f3a", "#fdca26", "#f0f921",
            ],
        ),
        hex_list(
            "magma",
            &[
                "#000004", "#180f3d", "#440f76", "#721f81", "#9e2f7f", "#cd4071", "#f1605d",
                "#fd9668", "#feca8d", "#fcfdbf",
            ],
        ),
        hex_list(
            "inferno",
            &[
                "#000004", "#1b0c41", "#4a0c6b", "#781c6d", "#a52c60", "#cf4446", "#ed6925",
                "#fb9b06", "#f7d13d", "#fcffa4",
            ],
        ),
        hex_stops(
            "jet",
            &[
                (0.0, "#000080"),
                (0.125, "#0000ff"),
                (0.375, "#00ffff"),
                (0.625, "#ffff00"),
                (0.875, "#ff0000"),
                (1.0, "#800000"),
            ],
        ),
        hex_stops(
            "hot",
            &[(0.0, "#0b0000"), (0.365, "#ff0000"), (0.746, "#ffff00"), (1.0, "#ffffff")],
        ),
        hex_list("gray", &["#000000", "#ffffff"]),
        hex_list("Greys", &["#ffffff", "#000000"]),
        hex_list(
            "Blues",
            &["#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c", "#08306b"],
        ),
        hex_list(
            "Reds",
            &["#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a", "#ef3b2c", "#cb181d", "#a50f15", "#67000d"],
        ),
        hex_list(
            "YlOrRd",
            &["#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c", "#bd0026", "#800026"],
        ),
        hex_stops(
            "terrain",
            &[
                (0.0, "#333399"),
                (0.15, "#0099ff"),
                (0.25, "#00cc66"),
                (0.5, "#ffff99"),
                (0.75, "#805c54"),
                (1.0, "#ffffff"),
            ],
        ),
    ]
}

/// All available colormaps by name.
#[derive(Debug, Clone)]
pub struct ColormapRegistry {
    maps: IndexMap<String, Colormap>,
}

impl ColormapRegistry {
    /// The built-in colormaps and their reversed variants.
    pub fn builtin() -> Self {
        let mut registry = Self {
            maps: IndexMap::new(),
        };
        for map in builtin_colormaps() {
            registry.insert(map);
        }
        registry
    }

    /// Add a colormap and its reversed twin, replacing same-named maps.
    pub fn insert(&mut self, map: Colormap) {
        let reversed = map.reversed();
        self.maps.insert(map.name().to_string(), map);
        self.maps.insert(reversed.name().to_string(), reversed);
    }

    pub fn get(&self, name: &str) -> RenderResult<&Colormap> {
        self.maps
            .get(name)
            .ok_or_else(|| RenderError::UnknownColormap(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.maps.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.maps.keys().cloned().collect()
    }

    /// Add colormaps from a JSON document of `name -> [stop, ...]`.
    pub fn extend_from_json(&mut self, json: &str) -> RenderResult<usize> {
        let parsed: IndexMap<String, Vec<ColorStop>> = serde_json::from_str(json)
            .map_err(|e| RenderError::UnknownColormap(format!("invalid colormap file: {}", e)))?;
        let count = parsed.len();
        for (name, stops) in parsed {
            let mut converted = Vec::with_capacity(stops.len());
            for stop in &stops {
                let color = Color::from_hex(&stop.color).ok_or_else(|| {
                    RenderError::UnknownColormap(format!("{}: bad colour '{}'", name, stop.color))
                })?;
                converted.push((stop.value, color));
            }
            self.insert(Colormap::new(&name, converted)?);
            debug!(colormap = %name, stops = stops.len(), "Loaded colormap");
        }
        Ok(count)
    }

    pub fn extend_from_file(&mut self, path: &Path) -> RenderResult<usize> {
        let content = std::fs::read_to_string(path)?;
        self.extend_from_json(&content)
    }
}

impl Default for ColormapRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#FF0000"), Some((255, 0, 0)));
        assert_eq!(hex_to_rgb("00ff00"), Some((0, 255, 0)));
        assert_eq!(hex_to_rgb("#GGGGGG"), None);
        assert_eq!(hex_to_rgb("#fff"), None);
    }

    #[test]
    fn test_interpolate_midpoint() {
        let c = interpolate_color(Color::rgb(0, 0, 0), Color::rgb(255, 255, 255), 0.5);
        assert_eq!(c, Color::rgb(128, 128, 128));
    }

    #[test]
    fn test_seismic_centre_is_white() {
        let registry = ColormapRegistry::builtin();
        let seismic = registry.get("seismic").unwrap();
        assert_eq!(seismic.at(0.5), Color::WHITE);
        assert_eq!(seismic.at(0.25), Color::rgb(0, 0, 255));
        assert_eq!(seismic.at(-1.0), seismic.under());
        assert_eq!(seismic.at(2.0), Color::rgb(128, 0, 0));
    }

    #[test]
    fn test_reversed_variants_registered() {
        let registry = ColormapRegistry::builtin();
        assert_eq!(registry.names().len(), 32);
        let gray = registry.get("gray").unwrap();
        let gray_r = registry.get("gray_r").unwrap();
        assert_eq!(gray.at(0.0), gray_r.at(1.0));
        assert_eq!(gray_r.reversed().name(), "gray");
    }

    #[test]
    fn test_unknown_colormap() {
        let registry = ColormapRegistry::builtin();
        assert!(matches!(registry.get("nope"), Err(RenderError::UnknownColormap(_))));
    }

    #[test]
    fn test_extend_from_json_rescales_values() {
        let mut registry = ColormapRegistry::builtin();
        let n = registry
            .extend_from_json(r##"{"anomaly": [{"value": -5, "color": "#000000"}, {"value": 5, "color": "#ffffff"}]}"##)
            .unwrap();
        assert_eq!(n, 1);
        let map = registry.get("anomaly").unwrap();
        assert_eq!(map.at(0.5), Color::rgb(128, 128, 128));
        assert!(registry.contains("anomaly_r"));
    }
}
