//! The render pipeline.

use image::Rgba;
use imageproc::drawing::draw_line_segment_mut;
use map_config::{OptionSet, PlotType, PresetRegistry};
use netcdf_parser::{read_coordinates, read_slice, Dataset, Grid2D};
use projection::{Projection, ProjectionKind};
use renderer::{
    draw_colorbar, draw_pcolormesh, draw_polylines, Axes, Canvas, Color, ColormapRegistry,
    FeatureKind, FeatureSource, MapView, Normalization, ProjectedMesh, RenderConfig,
};
use std::time::Instant;
use tracing::{debug, info};

use crate::error::{FigureError, FigureResult};
use crate::settings::resolve_map_settings;
use crate::transform::{
    apply_correction, mask_out_of_domain, offset_longitudes, project_mesh, swap_longitude_halves,
};

/// Everything derived from the dataset for one render: projection, display
/// longitudes, latitudes, the corrected slice and its projected mesh.
#[derive(Debug, Clone)]
pub struct FigureContext {
    pub projection: Projection,
    pub lons: Vec<f64>,
    pub lats: Vec<f64>,
    pub data: Grid2D,
    pub mesh: ProjectedMesh,
}

impl FigureContext {
    pub fn build<D: Dataset + ?Sized>(
        dataset: &D,
        options: &OptionSet,
        presets: Option<&PresetRegistry>,
    ) -> FigureResult<Self> {
        let settings = resolve_map_settings(options, presets)?;
        let projection = Projection::from_settings(&settings)?;

        let coords = read_coordinates(dataset)?;
        let time_index = options.time_index.ok_or(FigureError::Unset("time_index"))?;
        let mut data = read_slice(dataset, &options.variable, time_index, options.pl_index)?;
        if data.rows() != coords.lats.len() || data.cols() != coords.lons.len() {
            return Err(FigureError::Shape(format!(
                "'{}' slice is {}x{} but the grid is {}x{}",
                options.variable,
                data.rows(),
                data.cols(),
                coords.lats.len(),
                coords.lons.len()
            )));
        }
        apply_correction(&mut data, options.coef, options.offset);

        let lons = offset_longitudes(&coords.lons, options.lon_offset);
        swap_longitude_halves(&mut data);

        let mesh = project_mesh(&projection, &lons, &coords.lats)?;
        if projection.kind() == ProjectionKind::Ortho {
            let masked = mask_out_of_domain(data.values_mut(), mesh.x(), mesh.y());
            debug!(masked, "Masked cells on the hidden hemisphere");
        }

        Ok(Self {
            projection,
            lons,
            lats: coords.lats,
            data,
            mesh,
        })
    }
}

/// What a render drew.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub projection: ProjectionKind,
    pub cells_drawn: usize,
    pub norm: Normalization,
}

/// Shared drawing resources: layout and colours, the colormap set and the
/// decoration source.
pub struct Figure<'a> {
    config: &'a RenderConfig,
    colormaps: &'a ColormapRegistry,
    features: &'a dyn FeatureSource,
}

impl<'a> Figure<'a> {
    pub fn new(
        config: &'a RenderConfig,
        colormaps: &'a ColormapRegistry,
        features: &'a dyn FeatureSource,
    ) -> Self {
        Self {
            config,
            colormaps,
            features,
        }
    }

    /// Draw the map for `options` into `axes` of `canvas`.
    ///
    /// A failure part way leaves the canvas partly drawn.
    pub fn render<D: Dataset + ?Sized>(
        &self,
        canvas: &mut Canvas,
        axes: &Axes,
        dataset: &D,
        options: &OptionSet,
        presets: Option<&PresetRegistry>,
    ) -> FigureResult<RenderSummary> {
        let start = Instant::now();

        if options.plot_type != PlotType::Mesh {
            return Err(FigureError::UnsupportedPlotType(options.plot_type));
        }
        let cmap = self.colormaps.get(&options.cmap)?;

        let context = FigureContext::build(dataset, options, presets)?;
        let projection = &context.projection;

        let (main, bar) = if options.colorbar {
            let (main, bar) = axes.append_axes_right(self.config.colorbar_size, self.config.colorbar_pad);
            (main, Some(bar))
        } else {
            (*axes, None)
        };
        let view = MapView::fit(projection.extent(), &main);

        let norm = if options.norm {
            Normalization::midpoint(options.c_min, options.midpoint, options.c_max)?
        } else {
            Normalization::linear_from_data(context.data.values())
        };

        // ocean, data, then decorations, all clipped to the map boundary
        let mut layer = view.new_layer();
        let ocean = self.config.ocean_color.to_rgba();
        for pixel in layer.pixels_mut() {
            *pixel = ocean;
        }

        let cells_drawn = draw_pcolormesh(
            &mut layer,
            &view,
            &context.mesh,
            context.data.values(),
            cmap,
            &norm,
        );

        for (kind, enabled, color) in [
            (FeatureKind::Coastlines, true, self.config.coastline_color),
            (FeatureKind::Countries, options.countries, self.config.country_color),
            (FeatureKind::Rivers, options.rivers, self.config.river_color),
        ] {
            if !enabled {
                continue;
            }
            let polylines = self.features.polylines(kind, projection.resolution())?;
            debug!(%kind, count = polylines.len(), "Drawing decoration");
            draw_polylines(&mut layer, &view, projection, &polylines, color);
        }

        let boundary = projection.boundary();
        let mask = view.boundary_mask(&boundary);
        let (left, top) = view.origin();
        canvas.composite(&layer, Some(&mask), left, top);
        draw_outline(canvas, &view, &boundary);

        if let Some(bar) = bar {
            draw_colorbar(canvas, &bar, cmap, &norm);
        }

        info!(
            variable = %options.variable,
            projection = projection.kind().code(),
            cells = cells_drawn,
            vmin = norm.vmin(),
            vmax = norm.vmax(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Rendered figure"
        );

        Ok(RenderSummary {
            projection: projection.kind(),
            cells_drawn,
            norm,
        })
    }

    /// Render onto a fresh canvas of the configured size and encode it.
    pub fn render_png<D: Dataset + ?Sized>(
        &self,
        dataset: &D,
        options: &OptionSet,
        presets: Option<&PresetRegistry>,
    ) -> FigureResult<Vec<u8>> {
        let mut canvas = Canvas::new(self.config.width, self.config.height, self.config.background);
        let axes = canvas.axes(self.config.margin);
        self.render(&mut canvas, &axes, dataset, options, presets)?;
        Ok(canvas.encode_png()?)
    }
}

fn draw_outline(canvas: &mut Canvas, view: &MapView, boundary: &projection::Boundary) {
    let points = view.boundary_points(boundary);
    if points.len() < 2 {
        return;
    }
    let (left, top) = view.origin();
    let color: Rgba<u8> = Color::BLACK.to_rgba();
    let image = canvas.image_mut();
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        draw_line_segment_mut(
            image,
            ((a.x + left as i32) as f32, (a.y + top as i32) as f32),
            ((b.x + left as i32) as f32, (b.y + top as i32) as f32),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use renderer::NoFeatures;
    use test_utils::{era5_pressure_levels, era5_single_level};

    fn options_for<D: Dataset + ?Sized>(dataset: &D) -> OptionSet {
        map_config::init_defaults(dataset).unwrap()
    }

    #[test]
    fn test_context_applies_transforms() {
        let dataset = era5_single_level(4, 3, 2);
        let mut options = options_for(&dataset);
        options.variable = "u10".to_string();
        options.coef = 2.0;
        options.offset = 3.0;
        options.lon_offset = 180.0;
        let context = FigureContext::build(&dataset, &options, None).unwrap();
        assert!(context.data.values().iter().all(|&v| v == 5.0));
        assert_eq!(context.lons, vec![-180.0, -90.0, 0.0, 90.0]);
        assert_eq!((context.mesh.rows(), context.mesh.cols()), (3, 4));
    }

    #[test]
    fn test_context_swaps_halves() {
        let dataset = era5_single_level(4, 3, 1);
        let options = options_for(&dataset);
        let context = FigureContext::build(&dataset, &options, None).unwrap();
        let raw = read_slice(&dataset, "t2m", 0, None).unwrap();
        assert_eq!(context.data.get(0, 0), raw.get(0, 2));
        assert_eq!(context.data.get(1, 3), raw.get(1, 1));
    }

    #[test]
    fn test_context_orthographic_masks_far_side() {
        let dataset = era5_single_level(8, 5, 1);
        let mut options = options_for(&dataset);
        options.projection = ProjectionKind::Ortho;
        options.variable = "u10".to_string();
        let context = FigureContext::build(&dataset, &options, None).unwrap();
        let nan = context.data.values().iter().filter(|v| v.is_nan()).count();
        assert!(nan > 0);
        assert!(nan < context.data.values().len());
    }

    #[test]
    fn test_context_requires_time_index() {
        let dataset = era5_single_level(4, 3, 1);
        let mut options = options_for(&dataset);
        options.time_index = None;
        assert!(matches!(
            FigureContext::build(&dataset, &options, None),
            Err(FigureError::Unset("time_index"))
        ));
    }

    #[test]
    fn test_context_pressure_level() {
        let dataset = era5_pressure_levels(4, 3, 2, &[500.0, 850.0]);
        let mut options = options_for(&dataset);
        options.time_index = Some(1);
        options.pl_index = Some(1);
        let context = FigureContext::build(&dataset, &options, None).unwrap();
        assert!(context.data.values().iter().all(|&v| v == 101.0));
    }

    #[test]
    fn test_unsupported_plot_type() {
        let dataset = era5_single_level(4, 3, 1);
        let mut options = options_for(&dataset);
        options.plot_type = PlotType::Streamplot;
        let config = RenderConfig::default();
        let colormaps = ColormapRegistry::builtin();
        let figure = Figure::new(&config, &colormaps, &NoFeatures);
        let mut canvas = Canvas::new(100, 60, Color::WHITE);
        let axes = canvas.axes(0);
        assert!(matches!(
            figure.render(&mut canvas, &axes, &dataset, &options, None),
            Err(FigureError::UnsupportedPlotType(PlotType::Streamplot))
        ));
    }
}
