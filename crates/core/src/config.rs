use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Option grid has no {0}")]
    EmptyAxis(&'static str),
    #[error("Option grid {axis} entry {value:?} is not a single path component")]
    InvalidEntry { axis: &'static str, value: String },
    #[error("Option grid {axis} entry {value:?} appears more than once")]
    DuplicateEntry { axis: &'static str, value: String },
}

/// Declarative build-option grid that the enumerator expands per package.
///
/// Each axis is an ordered list; the expansion order is architecture, compiler,
/// PIE mode, optimization level, then linker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionGrid {
    #[serde(default = "default_architectures")]
    pub architectures: Vec<String>,
    #[serde(default = "default_compilers")]
    pub compilers: Vec<String>,
    #[serde(default = "default_pie_modes")]
    pub pie_modes: Vec<String>,
    #[serde(default = "default_opt_levels")]
    pub opt_levels: Vec<String>,
    #[serde(default = "default_linkers")]
    pub linkers: Vec<String>,
}

fn default_architectures() -> Vec<String> {
    vec!["x64".to_string()]
}
fn default_compilers() -> Vec<String> {
    vec!["clang-13".to_string(), "gcc-11".to_string()]
}
fn default_pie_modes() -> Vec<String> {
    vec!["pie".to_string()]
}
fn default_opt_levels() -> Vec<String> {
    ["o0", "o1", "o2", "o3", "os", "ofast"].iter().map(|s| s.to_string()).collect()
}
fn default_linkers() -> Vec<String> {
    vec!["bfd".to_string(), "gold".to_string()]
}

impl Default for OptionGrid {
    fn default() -> Self {
        Self {
            architectures: default_architectures(),
            compilers: default_compilers(),
            pie_modes: default_pie_modes(),
            opt_levels: default_opt_levels(),
            linkers: default_linkers(),
        }
    }
}

/// A single point of the option grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPoint<'a> {
    pub arch: &'a str,
    pub compiler: &'a str,
    pub pie: &'a str,
    pub opt_level: &'a str,
    pub linker: &'a str,
}

impl OptionGrid {
    /// Load a grid from a YAML (`.yaml`/`.yml`) or JSON file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read option grid at {}", path.display()))?;
        let grid: OptionGrid = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            serde_json::from_str(&body).context("Failed to parse option grid JSON")?
        } else {
            serde_yaml::from_str(&body).context("Failed to parse option grid YAML")?
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Every axis must be non-empty and duplicate-free, and every entry usable as a
    /// path component.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, values) in self.axes() {
            if values.is_empty() {
                return Err(ConfigError::EmptyAxis(axis));
            }
            if let Some(bad) = values
                .iter()
                .find(|v| v.is_empty() || v.contains('/') || v.contains('\\') || *v == "..")
            {
                return Err(ConfigError::InvalidEntry { axis, value: bad.clone() });
            }
            let mut seen = HashSet::new();
            if let Some(dup) = values.iter().find(|v| !seen.insert(v.as_str())) {
                return Err(ConfigError::DuplicateEntry { axis, value: dup.clone() });
            }
        }
        Ok(())
    }

    /// Expand the grid in its fixed iteration order.
    pub fn points(&self) -> Vec<GridPoint<'_>> {
        let mut points = Vec::with_capacity(self.len());
        for arch in &self.architectures {
            for compiler in &self.compilers {
                for pie in &self.pie_modes {
                    for opt_level in &self.opt_levels {
                        for linker in &self.linkers {
                            points.push(GridPoint {
                                arch: arch.as_str(),
                                compiler: compiler.as_str(),
                                pie: pie.as_str(),
                                opt_level: opt_level.as_str(),
                                linker: linker.as_str(),
                            });
                        }
                    }
                }
            }
        }
        points
    }

    pub fn len(&self) -> usize {
        self.axes().iter().map(|(_, v)| v.len()).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn axes(&self) -> [(&'static str, &Vec<String>); 5] {
        [
            ("architectures", &self.architectures),
            ("compilers", &self.compilers),
            ("pie modes", &self.pie_modes),
            ("optimization levels", &self.opt_levels),
            ("linkers", &self.linkers),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_has_24_points_in_order() {
        let grid = OptionGrid::default();
        let points = grid.points();
        assert_eq!(points.len(), 24);
        assert_eq!(grid.len(), 24);
        assert_eq!(
            (points[0].compiler, points[0].opt_level, points[0].linker),
            ("clang-13", "o0", "bfd")
        );
        assert_eq!(
            (points[1].compiler, points[1].opt_level, points[1].linker),
            ("clang-13", "o0", "gold")
        );
        assert_eq!(points[12].compiler, "gcc-11");
        assert_eq!(points[23].opt_level, "ofast");
    }

    #[test]
    fn validate_rejects_separators_and_empty_axes() {
        let mut grid = OptionGrid::default();
        grid.linkers = vec!["bfd/../x".into()];
        assert!(matches!(grid.validate(), Err(ConfigError::InvalidEntry { axis: "linkers", .. })));

        grid.linkers = vec!["bfd".into(), "gold".into(), "bfd".into()];
        assert_eq!(
            grid.validate(),
            Err(ConfigError::DuplicateEntry { axis: "linkers", value: "bfd".into() })
        );

        grid.linkers.clear();
        assert_eq!(grid.validate(), Err(ConfigError::EmptyAxis("linkers")));
    }
}
