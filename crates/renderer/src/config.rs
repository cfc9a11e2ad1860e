//! Renderer configuration.

use crate::colormap::Color;

/// Canvas size, colours and colorbar layout used when drawing a map.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Pixels left empty around the axes.
    pub margin: u32,
    pub background: Color,
    /// Fill inside the map boundary, under the data.
    pub ocean_color: Color,
    pub coastline_color: Color,
    pub country_color: Color,
    pub river_color: Color,
    /// Colorbar width as a fraction of the axes width.
    pub colorbar_size: f64,
    /// Gap between the map axes and the colorbar, in pixels.
    pub colorbar_pad: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
            margin: 20,
            background: Color::WHITE,
            ocean_color: Color::rgb(0, 255, 255),
            coastline_color: Color::BLACK,
            country_color: Color::rgb(64, 64, 64),
            river_color: Color::rgb(0, 0, 255),
            colorbar_size: 0.05,
            colorbar_pad: 10,
        }
    }
}

impl RenderConfig {
    /// Defaults overridden by `RENDER_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("RENDER_WIDTH") {
            if let Ok(width) = val.parse() {
                config.width = width;
            }
        }

        if let Ok(val) = std::env::var("RENDER_HEIGHT") {
            if let Ok(height) = val.parse() {
                config.height = height;
            }
        }

        if let Ok(val) = std::env::var("RENDER_MARGIN") {
            if let Ok(margin) = val.parse() {
                config.margin = margin;
            }
        }

        for (var, slot) in [
            ("RENDER_BACKGROUND", &mut config.background),
            ("RENDER_OCEAN_COLOR", &mut config.ocean_color),
            ("RENDER_COASTLINE_COLOR", &mut config.coastline_color),
            ("RENDER_COUNTRY_COLOR", &mut config.country_color),
            ("RENDER_RIVER_COLOR", &mut config.river_color),
        ] {
            if let Some(color) = std::env::var(var).ok().and_then(|v| Color::from_hex(&v)) {
                *slot = color;
            }
        }

        if let Ok(val) = std::env::var("RENDER_COLORBAR_SIZE") {
            if let Ok(size) = val.parse() {
                config.colorbar_size = size;
            }
        }

        if let Ok(val) = std::env::var("RENDER_COLORBAR_PAD") {
            if let Ok(pad) = val.parse() {
                config.colorbar_pad = pad;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("canvas width and height must be > 0".to_string());
        }
        if 2 * self.margin >= self.width.min(self.height) {
            return Err("margin leaves no room for the map".to_string());
        }
        if !(0.0..0.5).contains(&self.colorbar_size) {
            return Err("colorbar_size must be in [0, 0.5)".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ocean_color, Color::rgb(0, 255, 255));
    }

    #[test]
    fn test_validate_rejects_huge_margin() {
        let config = RenderConfig {
            margin: 400,
            ..RenderConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
