//! The projection catalogue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProjectionError;

/// Supported map projections, identified by their short codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionKind {
    Cyl,
    Merc,
    Mill,
    Moll,
    Ortho,
    Npstere,
    Spstere,
}

impl ProjectionKind {
    pub fn all() -> &'static [ProjectionKind] {
        &[
            ProjectionKind::Cyl,
            ProjectionKind::Merc,
            ProjectionKind::Mill,
            ProjectionKind::Moll,
            ProjectionKind::Ortho,
            ProjectionKind::Npstere,
            ProjectionKind::Spstere,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            ProjectionKind::Cyl => "cyl",
            ProjectionKind::Merc => "merc",
            ProjectionKind::Mill => "mill",
            ProjectionKind::Moll => "moll",
            ProjectionKind::Ortho => "ortho",
            ProjectionKind::Npstere => "npstere",
            ProjectionKind::Spstere => "spstere",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProjectionKind::Cyl => "Cylindrical Equidistant",
            ProjectionKind::Merc => "Mercator",
            ProjectionKind::Mill => "Miller Cylindrical",
            ProjectionKind::Moll => "Mollweide",
            ProjectionKind::Ortho => "Orthographic",
            ProjectionKind::Npstere => "North Polar Stereographic",
            ProjectionKind::Spstere => "South Polar Stereographic",
        }
    }

    /// The `"code (Name)"` label shown in choice lists.
    pub fn choice_label(&self) -> String {
        format!("{} ({})", self.code(), self.name())
    }

    /// Projections whose extent is fixed and cannot be cropped with corner
    /// coordinates.
    pub fn without_boundaries(&self) -> bool {
        matches!(
            self,
            ProjectionKind::Moll | ProjectionKind::Npstere | ProjectionKind::Spstere
        )
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ProjectionKind {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectionKind::all()
            .iter()
            .copied()
            .find(|k| k.code() == s)
            .ok_or_else(|| ProjectionError::UnknownProjection(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        for kind in ProjectionKind::all() {
            assert_eq!(kind.code().parse::<ProjectionKind>().unwrap(), *kind);
        }
        assert!("lcc".parse::<ProjectionKind>().is_err());
    }

    #[test]
    fn test_choice_label() {
        assert_eq!(ProjectionKind::Moll.choice_label(), "moll (Mollweide)");
    }

    #[test]
    fn test_without_boundaries() {
        assert!(ProjectionKind::Moll.without_boundaries());
        assert!(ProjectionKind::Spstere.without_boundaries());
        assert!(!ProjectionKind::Cyl.without_boundaries());
        assert!(!ProjectionKind::Ortho.without_boundaries());
    }
}
