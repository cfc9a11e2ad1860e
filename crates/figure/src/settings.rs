//! Map settings for a render call.

use map_config::{OptionSet, PresetError, PresetRegistry};
use projection::MapSettings;
use serde_json::Value;
use tracing::debug;

/// Keyword settings for the projection.
///
/// With `options.preset` set, the preset's stored arguments are copied and
/// only `resolution` is replaced by the option's. Otherwise the settings are
/// `projection`, `resolution`, `lon_0` and `lat_0`, plus the four corners
/// when `boundaries` is on.
pub fn resolve_map_settings(
    options: &OptionSet,
    presets: Option<&PresetRegistry>,
) -> Result<MapSettings, PresetError> {
    let resolution = Value::from(options.resolution.code());

    if let Some(name) = &options.preset {
        let entry = presets
            .ok_or_else(|| PresetError::NotFound(name.clone()))?
            .get(name)?;
        let mut settings = entry.args.clone();
        settings.insert("resolution".to_string(), resolution);
        debug!(preset = %name, keys = settings.len(), "Map settings from preset");
        return Ok(settings);
    }

    let mut settings = MapSettings::new();
    settings.insert("projection".to_string(), Value::from(options.projection.code()));
    settings.insert("resolution".to_string(), resolution);
    settings.insert("lon_0".to_string(), Value::from(options.lon_0));
    settings.insert("lat_0".to_string(), Value::from(options.lat_0));
    if options.boundaries {
        let c = &options.corners;
        settings.insert("llcrnrlon".to_string(), Value::from(c.llcrnrlon));
        settings.insert("llcrnrlat".to_string(), Value::from(c.llcrnrlat));
        settings.insert("urcrnrlon".to_string(), Value::from(c.urcrnrlon));
        settings.insert("urcrnrlat".to_string(), Value::from(c.urcrnrlat));
    }
    debug!(projection = options.projection.code(), boundaries = options.boundaries, "Map settings from options");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use projection::ProjectionKind;
    use serde_json::json;
    use test_utils::presets::SAMPLE;
    use viewer_common::{MapCorners, Resolution};

    #[test]
    fn test_direct_mode_base_keys() {
        let options = OptionSet {
            lon_0: 30.0,
            ..OptionSet::default()
        };
        let settings = resolve_map_settings(&options, None).unwrap();
        let keys: Vec<&str> = settings.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["projection", "resolution", "lon_0", "lat_0"]);
        assert_eq!(settings["projection"], json!("moll"));
        assert_eq!(settings["lon_0"], json!(30.0));
    }

    #[test]
    fn test_direct_mode_with_corners() {
        let options = OptionSet {
            projection: ProjectionKind::Cyl,
            boundaries: true,
            corners: MapCorners::new(-20.0, 30.0, 40.0, 70.0),
            ..OptionSet::default()
        };
        let settings = resolve_map_settings(&options, None).unwrap();
        assert_eq!(settings.len(), 8);
        assert_eq!(settings["llcrnrlat"], json!(30.0));
        assert_eq!(settings["urcrnrlon"], json!(40.0));
    }

    #[test]
    fn test_preset_mode_overrides_resolution_only() {
        let presets = PresetRegistry::from_json(SAMPLE).unwrap();
        let options = OptionSet {
            preset: Some("europe_cyl".to_string()),
            resolution: Resolution::High,
            lon_0: 99.0,
            ..OptionSet::default()
        };
        let settings = resolve_map_settings(&options, Some(&presets)).unwrap();
        assert_eq!(settings["resolution"], json!("h"));
        assert_eq!(settings["llcrnrlon"], json!(-15));
        assert!(!settings.contains_key("lon_0"));
        // the registry itself is untouched
        assert_eq!(presets.get("europe_cyl").unwrap().args["resolution"], json!("l"));
    }

    #[test]
    fn test_preset_mode_unknown_preset() {
        let presets = PresetRegistry::from_json(SAMPLE).unwrap();
        let options = OptionSet {
            preset: Some("arctic".to_string()),
            ..OptionSet::default()
        };
        assert!(matches!(
            resolve_map_settings(&options, Some(&presets)),
            Err(PresetError::NotFound(_))
        ));
        assert!(resolve_map_settings(&options, None).is_err());
    }
}
