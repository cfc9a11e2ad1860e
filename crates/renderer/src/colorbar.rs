//! Vertical colorbar with under/over extensions.

use image::RgbaImage;
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut, draw_polygon_mut, draw_text_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;
use rusttype::{Font, Scale};
use tracing::warn;

use crate::canvas::{Axes, Canvas};
use crate::colormap::{Color, Colormap};
use crate::norm::Normalization;

/// Length of each extension triangle as a fraction of the bar height.
pub const EXTEND_FRAC: f64 = 0.05;

const TICKS: usize = 5;

const LABEL_SIZE: f32 = 11.0;

const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// Draw a colorbar filling `axes`: a ramp from the normalization's lower
/// to upper bound, a triangle below in the under colour and one above in
/// the over colour.
pub fn draw_colorbar(canvas: &mut Canvas, axes: &Axes, cmap: &Colormap, norm: &Normalization) {
    let image = canvas.image_mut();
    let extend = ((axes.height as f64 * EXTEND_FRAC).round() as u32).max(1);
    if axes.height <= 2 * extend + 1 || axes.width == 0 {
        return;
    }

    let ramp_top = axes.top + extend;
    let ramp_height = axes.height - 2 * extend;
    let (vmin, vmax) = (norm.vmin(), norm.vmax());

    for row in 0..ramp_height {
        // bottom row is vmin
        let f = (ramp_height - 1 - row) as f64 + 0.5;
        let value = vmin + (vmax - vmin) * f / ramp_height as f64;
        let color = cmap.at(norm.apply(value)).to_rgba();
        let y = ramp_top + row;
        for x in axes.left..axes.right() {
            put(image, x, y, color);
        }
    }

    let left = axes.left as i32;
    let right = axes.right() as i32 - 1;
    let mid = (left + right) / 2;
    let top = axes.top as i32;
    let ramp_top = ramp_top as i32;
    let ramp_bottom = ramp_top + ramp_height as i32 - 1;
    let bottom = axes.bottom() as i32 - 1;

    let over = [
        Point::new(left, ramp_top - 1),
        Point::new(right, ramp_top - 1),
        Point::new(mid, top),
    ];
    let under = [
        Point::new(left, ramp_bottom + 1),
        Point::new(mid, bottom),
        Point::new(right, ramp_bottom + 1),
    ];
    draw_polygon_mut(image, &over, cmap.over().to_rgba());
    draw_polygon_mut(image, &under, cmap.under().to_rgba());

    let outline = Color::BLACK.to_rgba();
    draw_hollow_rect_mut(
        image,
        Rect::at(left, ramp_top).of_size(axes.width, ramp_height),
        outline,
    );
    for tri in [&over, &under] {
        for k in 0..3 {
            let a = tri[k];
            let b = tri[(k + 1) % 3];
            draw_line_segment_mut(image, (a.x as f32, a.y as f32), (b.x as f32, b.y as f32), outline);
        }
    }

    // evenly spaced ticks on the right edge, labelled right of the tick
    let font = Font::try_from_bytes(FONT_DATA);
    if font.is_none() {
        warn!("Failed to load colorbar font, drawing ticks without labels");
    }
    let scale = Scale::uniform(LABEL_SIZE);
    let tick_len = (axes.width as f32 / 3.0).max(2.0);
    for t in 0..TICKS {
        let frac = t as f64 / (TICKS - 1) as f64;
        let y = ramp_bottom as f32 - (ramp_height - 1) as f32 * frac as f32;
        let x = right as f32;
        draw_line_segment_mut(image, (x + 1.0, y), (x + tick_len, y), outline);

        if let Some(font) = &font {
            let text = format_tick(vmin + (vmax - vmin) * frac);
            let label_x = (x + tick_len) as i32 + 2;
            let label_y = y as i32 - (LABEL_SIZE / 2.0) as i32;
            draw_text_mut(image, outline, label_x, label_y, scale, font, &text);
        }
    }
}

/// Short tick text: plain decimals without trailing zeros, exponent form
/// for very large or very small magnitudes.
pub fn format_tick(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 {
        return "0".to_string();
    }
    if !(1e-2..1e5).contains(&magnitude) {
        return format!("{:.1e}", value);
    }
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn put(image: &mut RgbaImage, x: u32, y: u32, color: image::Rgba<u8>) {
    if x < image.width() && y < image.height() {
        image.put_pixel(x, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::ColormapRegistry;

    #[test]
    fn test_ramp_runs_bottom_to_top() {
        let registry = ColormapRegistry::builtin();
        let gray = registry.get("gray").unwrap();
        let norm = Normalization::linear(0.0, 1.0);
        let mut canvas = Canvas::new(40, 200, Color::WHITE);
        let axes = Axes::new(10, 0, 20, 200);
        draw_colorbar(&mut canvas, &axes, gray, &norm);

        let near_top = canvas.image().get_pixel(20, 20)[0];
        let near_bottom = canvas.image().get_pixel(20, 180)[0];
        assert!(near_top > 200, "top of the ramp should be light, got {}", near_top);
        assert!(near_bottom < 55, "bottom of the ramp should be dark, got {}", near_bottom);
    }

    #[test]
    fn test_tick_text() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(25.0), "25");
        assert_eq!(format_tick(12.5), "12.5");
        assert_eq!(format_tick(-3.25), "-3.25");
        assert_eq!(format_tick(101325.0), "1.0e5");
        assert_eq!(format_tick(0.0004), "4.0e-4");
    }

    #[test]
    fn test_labels_drawn_beside_ticks() {
        let registry = ColormapRegistry::builtin();
        let gray = registry.get("gray").unwrap();
        let norm = Normalization::linear(0.0, 50.0);
        let white = Color::WHITE.to_rgba();
        let mut canvas = Canvas::new(120, 200, Color::WHITE);
        let axes = Axes::new(10, 0, 20, 200);
        draw_colorbar(&mut canvas, &axes, gray, &norm);

        // everything right of the ticks is label text
        let label_pixels = (40..120)
            .flat_map(|x| (0..200).map(move |y| (x, y)))
            .filter(|&(x, y)| canvas.image().get_pixel(x, y) != &white)
            .count();
        assert!(label_pixels > 0);
    }

    #[test]
    fn test_extension_triangles_use_end_colours() {
        let registry = ColormapRegistry::builtin();
        let seismic = registry.get("seismic").unwrap();
        let norm = Normalization::midpoint(0.0, 25.0, 50.0).unwrap();
        let mut canvas = Canvas::new(40, 200, Color::rgb(0, 255, 0));
        let axes = Axes::new(10, 0, 20, 200);
        draw_colorbar(&mut canvas, &axes, seismic, &norm);

        // just inside each triangle near its base, centred
        assert_eq!(canvas.image().get_pixel(20, 7), &seismic.over().to_rgba());
        assert_eq!(canvas.image().get_pixel(20, 192), &seismic.under().to_rgba());
        // corner beside the over triangle tip is untouched
        assert_eq!(canvas.image().get_pixel(11, 1), &Color::rgb(0, 255, 0).to_rgba());
    }
}
