//! Headless map renderer.
//!
//! Opens a reanalysis dataset, starts from the default options, applies
//! the edits in an option file and writes the rendered map as a PNG.

use anyhow::{Context, Result};
use clap::Parser;
use figure::Figure;
use indexmap::IndexMap;
use map_config::{OptionPanel, OptionSet, OptionValue, PresetRegistry};
use netcdf_parser::{
    extract, has_pressure_levels, list_plottable_variables, list_pressure_levels, list_timesteps,
    silence_hdf5_errors, NetCdfDataset,
};
use renderer::{ColormapRegistry, FeatureSource, GeoJsonFeatures, NoFeatures, RenderConfig};
use std::path::{Path, PathBuf};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "map-render")]
#[command(about = "Render a reanalysis variable on a map projection")]
struct Args {
    /// NetCDF dataset to open
    #[arg(short, long, env = "DATASET")]
    dataset: PathBuf,

    /// Option edits (YAML or JSON mapping of option key to value)
    #[arg(short, long, env = "OPTIONS_FILE")]
    options: Option<PathBuf>,

    /// Preset document; enables preset mode
    #[arg(long, env = "PRESETS_FILE")]
    presets: Option<PathBuf>,

    /// Directory of <kind>_<resolution>.geojson decoration files
    #[arg(long, env = "FEATURES_DIR")]
    features_dir: Option<PathBuf>,

    /// Extra colormaps as a JSON stop file
    #[arg(long, env = "COLORMAPS_FILE")]
    colormaps: Option<PathBuf>,

    /// Output PNG path
    #[arg(long, default_value = "map.png")]
    output: PathBuf,

    /// Canvas width in pixels (overrides RENDER_WIDTH)
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels (overrides RENDER_HEIGHT)
    #[arg(long)]
    height: Option<u32>,

    /// Print dataset metadata and default options as JSON, then exit
    #[arg(long)]
    describe: bool,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "JSON_LOGS")]
    json_logs: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs)?;
    silence_hdf5_errors();

    let dataset = match NetCdfDataset::open(&args.dataset) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!(path = %args.dataset.display(), error = %e, "Failed to open dataset");
            return Err(e).context("dataset could not be loaded");
        }
    };
    info!(path = %args.dataset.display(), "Dataset loaded");

    if args.describe {
        return describe(&dataset);
    }

    let mut colormaps = ColormapRegistry::builtin();
    if let Some(path) = &args.colormaps {
        let added = colormaps
            .extend_from_file(path)
            .with_context(|| format!("Failed to load colormaps from {}", path.display()))?;
        info!(count = added, "Loaded extra colormaps");
    }

    let presets = args
        .presets
        .as_ref()
        .map(PresetRegistry::load)
        .transpose()
        .context("Failed to load presets")?;

    let panel = OptionPanel::new(&dataset, &colormaps.names(), presets.as_ref())?;
    let mut options = panel.snapshot();
    if let Some(path) = &args.options {
        apply_option_file(&mut options, path)?;
    }

    let mut config = RenderConfig::from_env();
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    config.validate().map_err(anyhow::Error::msg)?;

    let features: Box<dyn FeatureSource> = match &args.features_dir {
        Some(dir) => Box::new(GeoJsonFeatures::new(dir)),
        None => Box::new(NoFeatures),
    };

    let figure = Figure::new(&config, &colormaps, features.as_ref());
    let png = figure
        .render_png(&dataset, &options, presets.as_ref())
        .context("Render failed")?;

    std::fs::write(&args.output, &png)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!(output = %args.output.display(), bytes = png.len(), "Map written");
    Ok(())
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder().with_max_level(level);
    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Apply `key: value` edits in file order. Unknown keys abort.
fn apply_option_file(options: &mut OptionSet, path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read option file {}", path.display()))?;
    let edits: IndexMap<String, OptionValue> = if path.extension().is_some_and(|e| e == "json") {
        serde_json::from_str(&contents)?
    } else {
        serde_yaml::from_str(&contents)?
    };

    for (key, value) in edits {
        options
            .update_by_name(&key, value)
            .with_context(|| format!("Invalid option edit in {}", path.display()))?;
    }
    Ok(())
}

fn describe(dataset: &NetCdfDataset) -> Result<()> {
    let metadata = extract(dataset)?;
    let timesteps = list_timesteps(dataset)?.labels();
    let levels: Vec<String> = if has_pressure_levels(dataset) {
        list_pressure_levels(dataset)?.iter().map(ToString::to_string).collect()
    } else {
        Vec::new()
    };
    let defaults = map_config::init_defaults(dataset)?;

    let report = serde_json::json!({
        "variables": metadata,
        "plottable": list_plottable_variables(dataset),
        "timesteps": timesteps,
        "pressure_levels": levels,
        "defaults": defaults,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
