//! The option record and its fixed key vocabulary.

use netcdf_parser::{has_pressure_levels, list_plottable_variables, list_timesteps, Dataset, DatasetError};
use projection::ProjectionKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;
use viewer_common::{MapCorners, Resolution};

use crate::error::{OptionError, OptionResult};

/// Rendering mode. Only [`PlotType::Mesh`] is drawn; the others are accepted
/// choices that the renderer rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotType {
    #[default]
    Mesh,
    Contour,
    Contourf,
    Streamplot,
}

impl PlotType {
    pub fn all() -> &'static [PlotType] {
        &[PlotType::Mesh, PlotType::Contour, PlotType::Contourf, PlotType::Streamplot]
    }

    pub fn code(&self) -> &'static str {
        match self {
            PlotType::Mesh => "mesh",
            PlotType::Contour => "contour",
            PlotType::Contourf => "contourf",
            PlotType::Streamplot => "streamplot",
        }
    }
}

impl fmt::Display for PlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PlotType {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlotType::all()
            .iter()
            .copied()
            .find(|p| p.code() == s.trim())
            .ok_or_else(|| OptionError::invalid_choice(OptionKey::PlotType, s))
    }
}

/// Every key an [`OptionSet`] recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    Variable,
    TimeIndex,
    PlIndex,
    LonOffset,
    Coef,
    Offset,
    Projection,
    Lon0,
    Lat0,
    Boundaries,
    Llcrnrlon,
    Llcrnrlat,
    Urcrnrlon,
    Urcrnrlat,
    Preset,
    Resolution,
    Countries,
    Rivers,
    Colorbar,
    Norm,
    Cmap,
    PlotType,
    CMin,
    CMax,
    Midpoint,
}

impl OptionKey {
    pub fn all() -> &'static [OptionKey] {
        use OptionKey::*;
        &[
            Variable, TimeIndex, PlIndex, LonOffset, Coef, Offset, Projection, Lon0, Lat0,
            Boundaries, Llcrnrlon, Llcrnrlat, Urcrnrlon, Urcrnrlat, Preset, Resolution, Countries,
            Rivers, Colorbar, Norm, Cmap, PlotType, CMin, CMax, Midpoint,
        ]
    }

    /// Key name as written in option files.
    pub fn name(&self) -> &'static str {
        match self {
            OptionKey::Variable => "variable",
            OptionKey::TimeIndex => "time_index",
            OptionKey::PlIndex => "pl_index",
            OptionKey::LonOffset => "lon_offset",
            OptionKey::Coef => "coef",
            OptionKey::Offset => "offset",
            OptionKey::Projection => "projection",
            OptionKey::Lon0 => "lon_0",
            OptionKey::Lat0 => "lat_0",
            OptionKey::Boundaries => "boundaries",
            OptionKey::Llcrnrlon => "llcrnrlon",
            OptionKey::Llcrnrlat => "llcrnrlat",
            OptionKey::Urcrnrlon => "urcrnrlon",
            OptionKey::Urcrnrlat => "urcrnrlat",
            OptionKey::Preset => "preset",
            OptionKey::Resolution => "resolution",
            OptionKey::Countries => "countries",
            OptionKey::Rivers => "rivers",
            OptionKey::Colorbar => "colorbar",
            OptionKey::Norm => "norm",
            OptionKey::Cmap => "cmap",
            OptionKey::PlotType => "plot_type",
            OptionKey::CMin => "c_min",
            OptionKey::CMax => "c_max",
            OptionKey::Midpoint => "midpoint",
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptionKey {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionKey::all()
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| OptionError::UnknownKey(s.to_string()))
    }
}

/// A loosely typed option value as it arrives from an option file or a
/// widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Null,
    Flag(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl OptionValue {
    pub fn kind(&self) -> &'static str {
        match self {
            OptionValue::Null => "null",
            OptionValue::Flag(_) => "boolean",
            OptionValue::Integer(_) => "integer",
            OptionValue::Number(_) => "number",
            OptionValue::Text(_) => "string",
        }
    }

    fn mismatch(&self, key: OptionKey, expected: &'static str) -> OptionError {
        OptionError::TypeMismatch {
            key: key.name().to_string(),
            expected,
            found: self.kind().to_string(),
        }
    }

    fn into_number(self, key: OptionKey) -> OptionResult<f64> {
        match self {
            OptionValue::Integer(i) => Ok(i as f64),
            OptionValue::Number(n) => Ok(n),
            other => Err(other.mismatch(key, "a number")),
        }
    }

    fn into_flag(self, key: OptionKey) -> OptionResult<bool> {
        match self {
            OptionValue::Flag(b) => Ok(b),
            other => Err(other.mismatch(key, "a boolean")),
        }
    }

    fn into_text(self, key: OptionKey) -> OptionResult<String> {
        match self {
            OptionValue::Text(s) => Ok(s),
            other => Err(other.mismatch(key, "a string")),
        }
    }

    fn into_index(self, key: OptionKey) -> OptionResult<usize> {
        match self {
            OptionValue::Integer(i) if i >= 0 => Ok(i as usize),
            other => Err(other.mismatch(key, "a non-negative integer")),
        }
    }

    fn into_optional_index(self, key: OptionKey) -> OptionResult<Option<usize>> {
        match self {
            OptionValue::Null => Ok(None),
            other => other.into_index(key).map(Some),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Null => f.write_str("null"),
            OptionValue::Flag(b) => write!(f, "{}", b),
            OptionValue::Integer(i) => write!(f, "{}", i),
            OptionValue::Number(n) => write!(f, "{}", n),
            OptionValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Flag(b)
    }
}

impl From<i64> for OptionValue {
    fn from(i: i64) -> Self {
        OptionValue::Integer(i)
    }
}

impl From<f64> for OptionValue {
    fn from(n: f64) -> Self {
        OptionValue::Number(n)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

impl From<Option<usize>> for OptionValue {
    fn from(index: Option<usize>) -> Self {
        match index {
            Some(i) => OptionValue::Integer(i as i64),
            None => OptionValue::Null,
        }
    }
}

/// Plotting options, one field per recognized key.
///
/// `time_index` is `None` until a dataset with a non-empty time axis is
/// loaded. `pl_index` is `None` for datasets without a pressure-level axis.
/// `preset` selects preset mode when set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionSet {
    pub variable: String,
    pub time_index: Option<usize>,
    pub pl_index: Option<usize>,
    pub lon_offset: f64,
    pub coef: f64,
    pub offset: f64,
    pub projection: ProjectionKind,
    pub lon_0: f64,
    pub lat_0: f64,
    pub boundaries: bool,
    #[serde(flatten)]
    pub corners: MapCorners,
    pub preset: Option<String>,
    pub resolution: Resolution,
    pub countries: bool,
    pub rivers: bool,
    pub colorbar: bool,
    pub norm: bool,
    pub cmap: String,
    pub plot_type: PlotType,
    pub c_min: f64,
    pub c_max: f64,
    pub midpoint: f64,
}

impl Default for OptionSet {
    fn default() -> Self {
        Self {
            variable: String::new(),
            time_index: None,
            pl_index: None,
            lon_offset: 0.0,
            coef: 1.0,
            offset: 0.0,
            projection: ProjectionKind::Moll,
            lon_0: 0.0,
            lat_0: 0.0,
            boundaries: false,
            corners: MapCorners::global(),
            preset: None,
            resolution: Resolution::Intermediate,
            countries: false,
            rivers: false,
            colorbar: false,
            norm: false,
            cmap: "seismic".to_string(),
            plot_type: PlotType::Mesh,
            c_min: 0.0,
            c_max: 50.0,
            midpoint: 25.0,
        }
    }
}

impl OptionSet {
    /// Assign one field. Values are interpreted by kind only; ranges and
    /// choice membership are the caller's business.
    pub fn update(&mut self, key: OptionKey, value: OptionValue) -> OptionResult<()> {
        match key {
            OptionKey::Variable => self.variable = value.into_text(key)?,
            OptionKey::TimeIndex => self.time_index = Some(value.into_index(key)?),
            OptionKey::PlIndex => self.pl_index = value.into_optional_index(key)?,
            OptionKey::LonOffset => self.lon_offset = value.into_number(key)?,
            OptionKey::Coef => self.coef = value.into_number(key)?,
            OptionKey::Offset => self.offset = value.into_number(key)?,
            OptionKey::Projection => {
                let code = value.into_text(key)?;
                self.projection = code
                    .parse()
                    .map_err(|_| OptionError::invalid_choice(key, code))?;
            }
            OptionKey::Lon0 => self.lon_0 = value.into_number(key)?,
            OptionKey::Lat0 => self.lat_0 = value.into_number(key)?,
            OptionKey::Boundaries => self.boundaries = value.into_flag(key)?,
            OptionKey::Llcrnrlon => self.corners.llcrnrlon = value.into_number(key)?,
            OptionKey::Llcrnrlat => self.corners.llcrnrlat = value.into_number(key)?,
            OptionKey::Urcrnrlon => self.corners.urcrnrlon = value.into_number(key)?,
            OptionKey::Urcrnrlat => self.corners.urcrnrlat = value.into_number(key)?,
            OptionKey::Preset => {
                self.preset = match value {
                    OptionValue::Null => None,
                    other => Some(other.into_text(key)?),
                }
            }
            OptionKey::Resolution => {
                let code = value.into_text(key)?;
                self.resolution = code
                    .parse()
                    .map_err(|_| OptionError::invalid_choice(key, code))?;
            }
            OptionKey::Countries => self.countries = value.into_flag(key)?,
            OptionKey::Rivers => self.rivers = value.into_flag(key)?,
            OptionKey::Colorbar => self.colorbar = value.into_flag(key)?,
            OptionKey::Norm => self.norm = value.into_flag(key)?,
            OptionKey::Cmap => self.cmap = value.into_text(key)?,
            OptionKey::PlotType => self.plot_type = value.into_text(key)?.parse()?,
            OptionKey::CMin => self.c_min = value.into_number(key)?,
            OptionKey::CMax => self.c_max = value.into_number(key)?,
            OptionKey::Midpoint => self.midpoint = value.into_number(key)?,
        }
        Ok(())
    }

    /// [`OptionSet::update`] addressed by key name.
    pub fn update_by_name(&mut self, name: &str, value: OptionValue) -> OptionResult<()> {
        self.update(name.parse()?, value)
    }

    /// Current value of a field.
    pub fn get(&self, key: OptionKey) -> OptionValue {
        match key {
            OptionKey::Variable => self.variable.clone().into(),
            OptionKey::TimeIndex => self.time_index.into(),
            OptionKey::PlIndex => self.pl_index.into(),
            OptionKey::LonOffset => self.lon_offset.into(),
            OptionKey::Coef => self.coef.into(),
            OptionKey::Offset => self.offset.into(),
            OptionKey::Projection => self.projection.code().into(),
            OptionKey::Lon0 => self.lon_0.into(),
            OptionKey::Lat0 => self.lat_0.into(),
            OptionKey::Boundaries => self.boundaries.into(),
            OptionKey::Llcrnrlon => self.corners.llcrnrlon.into(),
            OptionKey::Llcrnrlat => self.corners.llcrnrlat.into(),
            OptionKey::Urcrnrlon => self.corners.urcrnrlon.into(),
            OptionKey::Urcrnrlat => self.corners.urcrnrlat.into(),
            OptionKey::Preset => match &self.preset {
                Some(name) => name.clone().into(),
                None => OptionValue::Null,
            },
            OptionKey::Resolution => self.resolution.code().into(),
            OptionKey::Countries => self.countries.into(),
            OptionKey::Rivers => self.rivers.into(),
            OptionKey::Colorbar => self.colorbar.into(),
            OptionKey::Norm => self.norm.into(),
            OptionKey::Cmap => self.cmap.clone().into(),
            OptionKey::PlotType => self.plot_type.code().into(),
            OptionKey::CMin => self.c_min.into(),
            OptionKey::CMax => self.c_max.into(),
            OptionKey::Midpoint => self.midpoint.into(),
        }
    }
}

/// Default options for a freshly loaded dataset: the first plottable
/// variable, the first timestep and, when the dataset has one, the first
/// pressure level.
pub fn init_defaults<D: Dataset + ?Sized>(dataset: &D) -> OptionResult<OptionSet> {
    let variable = list_plottable_variables(dataset)
        .into_iter()
        .next()
        .ok_or_else(|| DatasetError::MissingVariable("no plottable variable".to_string()))?;
    let timesteps = list_timesteps(dataset)?;
    let pl_index = has_pressure_levels(dataset).then_some(0);

    info!(
        variable = %variable,
        timesteps = timesteps.len(),
        pressure_levels = pl_index.is_some(),
        "Initialized default options"
    );

    Ok(OptionSet {
        variable,
        time_index: (!timesteps.is_empty()).then_some(0),
        pl_index,
        ..OptionSet::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = OptionSet::default();
        assert_eq!(options.projection, ProjectionKind::Moll);
        assert_eq!(options.corners, MapCorners::new(-180.0, -90.0, 180.0, 90.0));
        assert_eq!(options.resolution, Resolution::Intermediate);
        assert_eq!(options.cmap, "seismic");
        assert_eq!((options.c_min, options.midpoint, options.c_max), (0.0, 25.0, 50.0));
        assert_eq!((options.coef, options.offset, options.lon_offset), (1.0, 0.0, 0.0));
        assert!(!options.norm && !options.colorbar && !options.boundaries);
        assert!(options.time_index.is_none() && options.pl_index.is_none());
    }

    #[test]
    fn test_key_names_roundtrip() {
        for key in OptionKey::all() {
            assert_eq!(key.name().parse::<OptionKey>().unwrap(), *key);
        }
        assert_eq!(OptionKey::all().len(), 25);
    }

    #[test]
    fn test_unknown_key_fails() {
        let mut options = OptionSet::default();
        let err = options.update_by_name("colour_map", "jet".into()).unwrap_err();
        assert!(matches!(err, OptionError::UnknownKey(k) if k == "colour_map"));
    }

    #[test]
    fn test_update_assigns_field() {
        let mut options = OptionSet::default();
        options.update(OptionKey::Coef, OptionValue::Integer(2)).unwrap();
        options.update(OptionKey::Offset, OptionValue::Number(3.5)).unwrap();
        options.update(OptionKey::Projection, "ortho".into()).unwrap();
        options.update(OptionKey::Urcrnrlat, OptionValue::Integer(60)).unwrap();
        assert_eq!(options.coef, 2.0);
        assert_eq!(options.offset, 3.5);
        assert_eq!(options.projection, ProjectionKind::Ortho);
        assert_eq!(options.corners.urcrnrlat, 60.0);
    }

    #[test]
    fn test_update_does_not_range_check() {
        let mut options = OptionSet::default();
        options.update(OptionKey::TimeIndex, OptionValue::Integer(9999)).unwrap();
        options.update(OptionKey::Midpoint, OptionValue::Number(-1e9)).unwrap();
        assert_eq!(options.time_index, Some(9999));
    }

    #[test]
    fn test_type_mismatch() {
        let mut options = OptionSet::default();
        let err = options.update(OptionKey::Norm, "yes".into()).unwrap_err();
        assert!(matches!(err, OptionError::TypeMismatch { ref key, .. } if key == "norm"));
        assert!(options.update(OptionKey::TimeIndex, OptionValue::Integer(-1)).is_err());
        assert!(options.update(OptionKey::Coef, OptionValue::Null).is_err());
    }

    #[test]
    fn test_pl_index_nullable() {
        let mut options = OptionSet::default();
        options.update(OptionKey::PlIndex, OptionValue::Integer(2)).unwrap();
        assert_eq!(options.pl_index, Some(2));
        options.update(OptionKey::PlIndex, OptionValue::Null).unwrap();
        assert_eq!(options.pl_index, None);
    }

    #[test]
    fn test_get_reflects_update() {
        let mut options = OptionSet::default();
        options.update(OptionKey::Preset, "world_moll".into()).unwrap();
        assert_eq!(options.get(OptionKey::Preset), OptionValue::from("world_moll"));
        assert_eq!(options.get(OptionKey::Resolution), OptionValue::from("i"));
        assert_eq!(options.get(OptionKey::PlIndex), OptionValue::Null);
    }

    #[test]
    fn test_plot_type_choices() {
        assert_eq!("contourf".parse::<PlotType>().unwrap(), PlotType::Contourf);
        assert!("quiver".parse::<PlotType>().is_err());
    }

    #[test]
    fn test_values_deserialize_by_kind() {
        let values: Vec<OptionValue> =
            serde_json::from_str(r#"[null, true, 3, 2.5, "moll"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                OptionValue::Null,
                OptionValue::Flag(true),
                OptionValue::Integer(3),
                OptionValue::Number(2.5),
                OptionValue::Text("moll".to_string()),
            ]
        );
    }

    #[test]
    fn test_serializes_flat() {
        let json = serde_json::to_value(OptionSet::default()).unwrap();
        assert_eq!(json["llcrnrlon"], serde_json::json!(-180.0));
        assert_eq!(json["projection"], serde_json::json!("moll"));
        assert_eq!(json["resolution"], serde_json::json!("i"));
        assert_eq!(json["plot_type"], serde_json::json!("mesh"));
    }
}
