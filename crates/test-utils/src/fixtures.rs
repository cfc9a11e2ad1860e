//! Common test fixtures.

use std::path::{Path, PathBuf};

/// Time constants.
pub mod time {
    /// Hours from 1900-01-01 to 2020-01-01 (43829 days).
    pub const HOURS_2020_01_01: f64 = 1_051_896.0;
}

/// Preset documents in the persisted JSON layout.
pub mod presets {
    /// Two presets: a global Mollweide and a regional cylindrical map.
    pub const SAMPLE: &str = r#"{
    "world_moll": {
        "description": "Global Mollweide centred on Greenwich",
        "filename": "world_moll.png",
        "args": {
            "projection": "moll",
            "lon_0": 0,
            "resolution": "c"
        }
    },
    "europe_cyl": {
        "description": "Europe, equidistant cylindrical",
        "filename": "europe_cyl.png",
        "args": {
            "projection": "cyl",
            "llcrnrlon": -15,
            "llcrnrlat": 35,
            "urcrnrlon": 45,
            "urcrnrlat": 72,
            "resolution": "l"
        }
    }
}
"#;
}

/// Write `contents` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

/// Write the sample preset document to `dir/presets.json`.
pub fn write_sample_presets(dir: &Path) -> PathBuf {
    write_file(dir, "presets.json", presets::SAMPLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_presets_are_valid_json() {
        let value: serde_json::Value = serde_json::from_str(presets::SAMPLE).unwrap();
        assert_eq!(value.as_object().map(|o| o.len()), Some(2));
    }

    #[test]
    fn test_write_sample_presets() {
        let dir = crate::temp_test_dir();
        let path = write_sample_presets(dir.path());
        assert!(path.exists());
    }
}
