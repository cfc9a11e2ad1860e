//! Map presets: named projection argument bundles with a preview image.
//!
//! The persisted document maps preset name to
//! `{"description": ..., "filename": ..., "args": {...}}` and is written
//! with 4-space indentation. Entry order is preserved across rewrites.

use indexmap::IndexMap;
use projection::MapSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{PresetError, PresetResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetEntry {
    pub description: String,
    /// Preview image, relative to the preset document's directory.
    pub filename: String,
    /// Projection keyword arguments.
    pub args: MapSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetRegistry {
    entries: IndexMap<String, PresetEntry>,
}

impl PresetRegistry {
    /// Read the preset document at `path`.
    pub fn load(path: impl AsRef<Path>) -> PresetResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let registry = Self::from_json(&content)?;
        info!(path = %path.display(), presets = registry.len(), "Loaded presets");
        Ok(registry)
    }

    pub fn from_json(json: &str) -> PresetResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The document text, 4-space indented.
    pub fn to_json(&self) -> PresetResult<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        buf.push(b'\n');
        // serde_json only emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> PresetResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> PresetResult<&PresetEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| PresetError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PresetEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace an entry. A replaced entry keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, entry: PresetEntry) -> Option<PresetEntry> {
        self.entries.insert(name.into(), entry)
    }

    /// Add a preset to the document at `path`, creating the document if it
    /// does not exist. The preset is named after `filename` without its
    /// extension. Read, modify and rewrite with no locking: concurrent
    /// writers lose updates.
    pub fn append(
        path: impl AsRef<Path>,
        description: &str,
        args: MapSettings,
        filename: &str,
    ) -> PresetResult<String> {
        let path = path.as_ref();
        let mut registry = if path.exists() {
            Self::load(path)?
        } else {
            Self::default()
        };

        let name = preset_name_from_filename(filename);
        let replaced = registry.insert(
            name.clone(),
            PresetEntry {
                description: description.to_string(),
                filename: filename.to_string(),
                args,
            },
        );
        registry.save(path)?;

        debug!(name = %name, replaced = replaced.is_some(), path = %path.display(), "Preset written");
        Ok(name)
    }

    /// Location of an entry's preview image, resolved against the directory
    /// holding the preset document.
    pub fn preview_path(&self, document: &Path, name: &str) -> PresetResult<PathBuf> {
        let entry = self.get(name)?;
        let dir = document.parent().unwrap_or_else(|| Path::new("."));
        Ok(dir.join(&entry.filename))
    }
}

/// `"world_moll.png"` -> `"world_moll"`.
pub fn preset_name_from_filename(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}
