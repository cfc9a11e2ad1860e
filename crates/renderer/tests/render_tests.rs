//! Drawing a projected field end to end: ocean fill, mesh, decorations,
//! colorbar and PNG output.

use image::Rgba;
use projection::{MapSettings, Projection};
use renderer::{
    draw_colorbar, draw_pcolormesh, draw_polylines, Canvas, Color, ColormapRegistry, MapView,
    Normalization, ProjectedMesh,
};
use serde_json::json;

fn projection(value: serde_json::Value) -> Projection {
    let settings: MapSettings = serde_json::from_value(value).unwrap();
    Projection::from_settings(&settings).unwrap()
}

fn mesh_for(projection: &Projection, lons: &[f64], lats: &[f64]) -> ProjectedMesh {
    let mut x = Vec::new();
    let mut y = Vec::new();
    for &lat in lats {
        for &lon in lons {
            let (px, py) = projection.forward(lon, lat);
            x.push(px);
            y.push(py);
        }
    }
    let n = lons.len() * lats.len();
    ProjectedMesh::new(lats.len(), lons.len(), x, y, vec![true; n]).unwrap()
}

#[test]
fn test_ellipse_clip_keeps_corners_background() {
    let proj = projection(json!({"projection": "moll"}));
    let mut canvas = Canvas::new(200, 100, Color::WHITE);
    let axes = canvas.axes(0);
    let view = MapView::fit(proj.extent(), &axes);

    let mut layer = view.new_layer();
    let lons: Vec<f64> = (0..=36).map(|i| -180.0 + 10.0 * i as f64).collect();
    let lats: Vec<f64> = (0..=18).map(|i| 90.0 - 10.0 * i as f64).collect();
    let mesh = mesh_for(&proj, &lons, &lats);
    let values = vec![1.0; lons.len() * lats.len()];
    let registry = ColormapRegistry::builtin();
    let drawn = draw_pcolormesh(
        &mut layer,
        &view,
        &mesh,
        &values,
        registry.get("Reds").unwrap(),
        &Normalization::linear(0.0, 1.0),
    );
    assert!(drawn > 0);

    let mask = view.boundary_mask(&proj.boundary());
    let (left, top) = view.origin();
    canvas.composite(&layer, Some(&mask), left, top);

    assert_eq!(canvas.image().get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
    let centre = canvas.image().get_pixel(100, 50);
    assert_eq!(centre, &registry.get("Reds").unwrap().at(1.0).to_rgba());
}

#[test]
fn test_coastline_drawn_in_line_colour() {
    let proj = projection(json!({"projection": "cyl"}));
    let canvas = Canvas::new(360, 180, Color::WHITE);
    let view = MapView::fit(proj.extent(), &canvas.axes(0));
    let mut layer = view.new_layer();
    // the equator
    let equator = vec![(-170.0, 0.0), (0.0, 0.0), (170.0, 0.0)];
    draw_polylines(&mut layer, &view, &proj, &[equator], Color::BLACK);
    assert_eq!(layer.get_pixel(180, 90), &Rgba([0, 0, 0, 255]));
    assert_eq!(layer.get_pixel(180, 40)[3], 0);
}

#[test]
fn test_rendered_map_encodes_to_png() {
    let proj = projection(json!({"projection": "cyl", "llcrnrlon": 0, "llcrnrlat": -30, "urcrnrlon": 60, "urcrnrlat": 30}));
    let mut canvas = Canvas::new(120, 80, Color::WHITE);
    let (main, bar) = canvas.axes(5).append_axes_right(0.05, 4);
    let view = MapView::fit(proj.extent(), &main);
    let lons: Vec<f64> = (0..=12).map(|i| 5.0 * i as f64).collect();
    let lats: Vec<f64> = (0..=12).map(|i| 30.0 - 5.0 * i as f64).collect();
    let values: Vec<f64> = (0..lons.len() * lats.len()).map(|k| k as f64).collect();
    let norm = Normalization::midpoint(0.0, 50.0, 168.0).unwrap();
    let registry = ColormapRegistry::builtin();
    let cmap = registry.get("seismic").unwrap();

    let mut layer = view.new_layer();
    draw_pcolormesh(&mut layer, &view, &mesh_for(&proj, &lons, &lats), &values, cmap, &norm);
    let (left, top) = view.origin();
    canvas.composite(&layer, None, left, top);
    draw_colorbar(&mut canvas, &bar, cmap, &norm);

    let png = canvas.encode_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(&decoded, canvas.image());
}
