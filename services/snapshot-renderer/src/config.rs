//! Render run configuration.
//!
//! Values come from three layers, later ones winning:
//! built-in defaults, an optional YAML file, then command-line flags
//! (which fall back to environment variables).
//!
//! ```yaml
//! data_root: ../out
//! gas_count: 2
//! max_snapshots: 2
//! step: 1
//! parallel: false
//! grid:
//!   rows: 70
//!   columns: 130
//! scales:
//!   pressure: { min: 0.64, max: 1.1 }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use snapshot_common::{ColorScale, FieldKind, FieldSpec, GridShape, SnapshotError, SnapshotResult};
use tracing::debug;

/// Everything a render run needs besides the figure style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Directory holding the `gas<N>/` trees.
    pub data_root: PathBuf,
    pub gas_count: usize,
    /// Exclusive upper bound on snapshot indices.
    pub max_snapshots: usize,
    pub step: usize,
    pub grid: GridShape,
    /// Render snapshots on the rayon pool instead of one after another.
    pub parallel: bool,
    /// Per-field color scale overrides, keyed `conc`, `temp` or `pressure`.
    pub scales: HashMap<FieldKind, ColorScale>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("../out"),
            gas_count: 2,
            max_snapshots: 2,
            step: 1,
            grid: GridShape::default(),
            parallel: false,
            scales: HashMap::new(),
        }
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub data_root: Option<PathBuf>,
    pub gas_count: Option<usize>,
    pub max_snapshots: Option<usize>,
    pub step: Option<usize>,
    pub parallel: Option<bool>,
}

impl RenderConfig {
    /// Parse a YAML document; missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> SnapshotResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| SnapshotError::config(e.to_string()))
    }

    /// Load a YAML configuration file.
    pub fn from_file(path: &Path) -> SnapshotResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| SnapshotError::io(path, e))?;
        debug!(path = %path.display(), "Loaded render config");
        serde_yaml::from_str(&text)
            .map_err(|e| SnapshotError::config(format!("{}: {}", path.display(), e)))
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(root) = overrides.data_root {
            self.data_root = root;
        }
        if let Some(gas_count) = overrides.gas_count {
            self.gas_count = gas_count;
        }
        if let Some(max_snapshots) = overrides.max_snapshots {
            self.max_snapshots = max_snapshots;
        }
        if let Some(step) = overrides.step {
            self.step = step;
        }
        if let Some(parallel) = overrides.parallel {
            self.parallel = parallel;
        }
        self
    }

    /// Reject settings that could never produce a figure.
    pub fn validate(&self) -> SnapshotResult<()> {
        if self.step == 0 {
            return Err(SnapshotError::InvalidStep);
        }
        if self.grid.is_empty() {
            return Err(SnapshotError::config(format!(
                "grid must have at least one row and column, got {}x{}",
                self.grid.rows, self.grid.columns
            )));
        }
        for spec in self.field_specs() {
            spec.scale.validate()?;
        }
        Ok(())
    }

    /// Field table in processing order with any overrides applied.
    pub fn field_specs(&self) -> Vec<FieldSpec> {
        FieldKind::ALL
            .into_iter()
            .map(|kind| {
                let scale = self
                    .scales
                    .get(&kind)
                    .copied()
                    .unwrap_or_else(|| kind.default_scale());
                FieldSpec::new(kind, scale)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.data_root, PathBuf::from("../out"));
        assert_eq!((config.gas_count, config.max_snapshots, config.step), (2, 2, 1));
        assert_eq!(config.grid, GridShape::new(70, 130));
        assert!(!config.parallel);
        assert_eq!(config.field_specs(), FieldSpec::defaults());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = RenderConfig::from_yaml_str(
            "max_snapshots: 40\nstep: 5\ngrid:\n  rows: 35\nscales:\n  temp: { min: 0.5, max: 1.5 }\n",
        )
        .unwrap();

        assert_eq!(config.max_snapshots, 40);
        assert_eq!(config.step, 5);
        assert_eq!(config.gas_count, 2);
        assert_eq!(config.grid, GridShape::new(35, 130));

        let specs = config.field_specs();
        assert_eq!(specs[0].scale, ColorScale::new(0.82, 1.1));
        assert_eq!(specs[1].scale, ColorScale::new(0.5, 1.5));
        assert_eq!(specs[2].scale, ColorScale::new(0.64, 1.1));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = RenderConfig::from_yaml_str("scales:\n  salinity: { min: 0.0, max: 1.0 }\n");
        assert!(matches!(result, Err(SnapshotError::Config(_))));
    }

    #[test]
    fn test_overrides_win() {
        let config = RenderConfig::default().with_overrides(ConfigOverrides {
            data_root: Some(PathBuf::from("/data")),
            step: Some(3),
            parallel: Some(true),
            ..Default::default()
        });
        assert_eq!(config.data_root, PathBuf::from("/data"));
        assert_eq!(config.step, 3);
        assert_eq!(config.max_snapshots, 2);
        assert!(config.parallel);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_step = RenderConfig {
            step: 0,
            ..Default::default()
        };
        assert!(matches!(zero_step.validate(), Err(SnapshotError::InvalidStep)));

        let empty_grid = RenderConfig {
            grid: GridShape::new(0, 130),
            ..Default::default()
        };
        assert!(matches!(empty_grid.validate(), Err(SnapshotError::Config(_))));

        let mut inverted = RenderConfig::default();
        inverted
            .scales
            .insert(FieldKind::Pressure, ColorScale::new(1.1, 0.64));
        assert!(matches!(inverted.validate(), Err(SnapshotError::Config(_))));
    }
}
