//! Option panel: choice lists plus one edit handler per option field.
//!
//! Each [`Control`] owns a closure bound to its field when the panel is
//! built. The closure parses the raw widget text (`"3 : 2020-01-01"`,
//! `"moll (Mollweide)"`, `"true"`) and updates that field of the panel's
//! [`OptionSet`].

use indexmap::IndexMap;
use netcdf_parser::{has_pressure_levels, list_plottable_variables, list_pressure_levels, list_timesteps, Dataset};
use projection::ProjectionKind;
use std::fmt;
use tracing::debug;
use viewer_common::Resolution;

use crate::error::{OptionError, OptionResult};
use crate::options::{init_defaults, OptionKey, OptionSet, OptionValue, PlotType};
use crate::presets::PresetRegistry;

/// What the display shell should refresh after an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Updated,
    /// The projection changed and set `boundaries`; corner entries follow it.
    Boundaries { enabled: bool },
    /// The norm toggle changed; the `c_min`/`midpoint`/`c_max` entries follow it.
    NormEntries { enabled: bool },
}

/// The lists offered by the panel's choice widgets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Choices {
    pub variables: Vec<String>,
    pub timesteps: Vec<String>,
    pub pressure_levels: Vec<String>,
    pub projections: Vec<String>,
    pub resolutions: Vec<String>,
    pub colormaps: Vec<String>,
    pub plot_types: Vec<String>,
    pub presets: Vec<String>,
}

/// Preset choice that switches the panel to direct map settings.
pub const NO_PRESET: &str = "none";

type Handler = Box<dyn Fn(&mut OptionSet, &str) -> OptionResult<Effect> + Send + Sync>;

/// Edit handler for a single option field.
pub struct Control {
    key: OptionKey,
    handler: Handler,
}

impl Control {
    fn new<F>(key: OptionKey, handler: F) -> Self
    where
        F: Fn(&mut OptionSet, &str) -> OptionResult<Effect> + Send + Sync + 'static,
    {
        Self {
            key,
            handler: Box::new(handler),
        }
    }

    pub fn key(&self) -> OptionKey {
        self.key
    }

    /// Parse `raw` and update this control's field.
    pub fn apply(&self, options: &mut OptionSet, raw: &str) -> OptionResult<Effect> {
        (self.handler)(options, raw)
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control").field("key", &self.key).finish_non_exhaustive()
    }
}

/// Option state for one loaded dataset.
#[derive(Debug)]
pub struct OptionPanel {
    options: OptionSet,
    choices: Choices,
    controls: IndexMap<OptionKey, Control>,
}

impl OptionPanel {
    /// Build the panel for a dataset. With a non-empty preset registry the
    /// panel starts in preset mode on the first preset.
    pub fn new<D: Dataset + ?Sized>(
        dataset: &D,
        colormaps: &[String],
        presets: Option<&PresetRegistry>,
    ) -> OptionResult<Self> {
        let mut options = init_defaults(dataset)?;

        let pressure_levels = if has_pressure_levels(dataset) {
            list_pressure_levels(dataset)?
                .iter()
                .map(ToString::to_string)
                .collect()
        } else {
            Vec::new()
        };

        let choices = Choices {
            variables: list_plottable_variables(dataset),
            timesteps: list_timesteps(dataset)?.labels(),
            pressure_levels,
            projections: ProjectionKind::all().iter().map(|p| p.choice_label()).collect(),
            resolutions: Resolution::all().iter().map(|r| r.code().to_string()).collect(),
            colormaps: colormaps.to_vec(),
            plot_types: PlotType::all().iter().map(|p| p.code().to_string()).collect(),
            presets: presets.map(preset_choices).unwrap_or_default(),
        };

        options.preset = presets.and_then(|p| p.names().into_iter().next());

        let controls = build_controls(&choices, presets.map(|p| p.names()).unwrap_or_default());
        Ok(Self {
            options,
            choices,
            controls,
        })
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// Copy of the current options for a render call.
    pub fn snapshot(&self) -> OptionSet {
        self.options.clone()
    }

    pub fn choices(&self) -> &Choices {
        &self.choices
    }

    pub fn control(&self, key: OptionKey) -> Option<&Control> {
        self.controls.get(&key)
    }

    /// Apply raw widget text to the field behind `key`.
    pub fn edit(&mut self, key: OptionKey, raw: &str) -> OptionResult<Effect> {
        let control = self
            .controls
            .get(&key)
            .ok_or_else(|| OptionError::UnknownKey(key.name().to_string()))?;
        let effect = control.apply(&mut self.options, raw)?;
        debug!(key = %key, raw = raw, ?effect, "Option edited");
        Ok(effect)
    }

    pub fn edit_by_name(&mut self, name: &str, raw: &str) -> OptionResult<Effect> {
        self.edit(name.parse()?, raw)
    }

    /// Whether the `c_min`/`midpoint`/`c_max` entries accept input.
    pub fn norm_entries_enabled(&self) -> bool {
        self.options.norm
    }

    /// Whether the corner entries accept input.
    pub fn corner_entries_enabled(&self) -> bool {
        self.options.boundaries
    }
}

fn build_controls(choices: &Choices, preset_names: Vec<String>) -> IndexMap<OptionKey, Control> {
    let mut controls = IndexMap::new();
    let mut add = |control: Control| {
        controls.insert(control.key(), control);
    };

    add(listed_text(OptionKey::Variable, choices.variables.clone()));
    add(listed_text(OptionKey::Cmap, choices.colormaps.clone()));
    add(preset_control(preset_names));
    add(indexed(OptionKey::TimeIndex, choices.timesteps.len()));
    add(indexed(OptionKey::PlIndex, choices.pressure_levels.len()));

    for key in [
        OptionKey::LonOffset,
        OptionKey::Coef,
        OptionKey::Offset,
        OptionKey::Lon0,
        OptionKey::Lat0,
        OptionKey::Llcrnrlon,
        OptionKey::Llcrnrlat,
        OptionKey::Urcrnrlon,
        OptionKey::Urcrnrlat,
        OptionKey::CMin,
        OptionKey::CMax,
        OptionKey::Midpoint,
    ] {
        add(Control::new(key, move |options, raw| {
            options.update(key, parse_number(key, raw)?.into())?;
            Ok(Effect::Updated)
        }));
    }

    for key in [
        OptionKey::Boundaries,
        OptionKey::Countries,
        OptionKey::Rivers,
        OptionKey::Colorbar,
    ] {
        add(Control::new(key, move |options, raw| {
            options.update(key, parse_flag(key, raw)?.into())?;
            Ok(Effect::Updated)
        }));
    }

    add(Control::new(OptionKey::Norm, |options, raw| {
        let enabled = parse_flag(OptionKey::Norm, raw)?;
        options.update(OptionKey::Norm, enabled.into())?;
        Ok(Effect::NormEntries { enabled })
    }));

    add(Control::new(OptionKey::Projection, |options, raw| {
        options.update(OptionKey::Projection, choice_code(raw).into())?;
        let enabled = !options.projection.without_boundaries();
        options.boundaries = enabled;
        Ok(Effect::Boundaries { enabled })
    }));

    for key in [OptionKey::Resolution, OptionKey::PlotType] {
        add(Control::new(key, move |options, raw| {
            options.update(key, choice_code(raw).into())?;
            Ok(Effect::Updated)
        }));
    }

    controls
}

/// Registry names followed by [`NO_PRESET`], unless a preset already uses that name.
fn preset_choices(registry: &PresetRegistry) -> Vec<String> {
    let mut names = registry.names();
    if !registry.contains(NO_PRESET) {
        names.push(NO_PRESET.to_string());
    }
    names
}

/// A registry name selects preset mode; [`NO_PRESET`] selects direct mode.
fn preset_control(registry_names: Vec<String>) -> Control {
    let key = OptionKey::Preset;
    let direct_allowed = !registry_names.is_empty() && !registry_names.iter().any(|n| n == NO_PRESET);
    Control::new(key, move |options, raw| {
        let value = raw.trim();
        let preset = if registry_names.iter().any(|n| n == value) {
            value.into()
        } else if direct_allowed && value == NO_PRESET {
            OptionValue::Null
        } else {
            return Err(OptionError::invalid_choice(key, value));
        };
        options.update(key, preset)?;
        Ok(Effect::Updated)
    })
}

/// Text that must be one of `allowed`.
fn listed_text(key: OptionKey, allowed: Vec<String>) -> Control {
    Control::new(key, move |options, raw| {
        let value = raw.trim();
        if !allowed.iter().any(|a| a == value) {
            return Err(OptionError::invalid_choice(key, value));
        }
        options.update(key, value.into())?;
        Ok(Effect::Updated)
    })
}

/// `"i : label"` text selecting index `i` of a list of `len` entries.
fn indexed(key: OptionKey, len: usize) -> Control {
    Control::new(key, move |options, raw| {
        let index = leading_index(raw)
            .filter(|&i| i < len)
            .ok_or_else(|| OptionError::invalid_choice(key, raw))?;
        options.update(key, OptionValue::Integer(index as i64))?;
        Ok(Effect::Updated)
    })
}

fn leading_index(raw: &str) -> Option<usize> {
    raw.split(':').next()?.trim().parse().ok()
}

/// `"moll (Mollweide)"` -> `"moll"`.
fn choice_code(raw: &str) -> &str {
    raw.split(" (").next().unwrap_or(raw).trim()
}

fn parse_number(key: OptionKey, raw: &str) -> OptionResult<f64> {
    raw.trim().parse().map_err(|_| OptionError::TypeMismatch {
        key: key.name().to_string(),
        expected: "a number",
        found: format!("'{}'", raw),
    })
}

fn parse_flag(key: OptionKey, raw: &str) -> OptionResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        _ => Err(OptionError::TypeMismatch {
            key: key.name().to_string(),
            expected: "a boolean",
            found: format!("'{}'", raw),
        }),
    }
}
