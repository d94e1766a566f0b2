//! Field kinds written by the simulation and their color scales.

use serde::{Deserialize, Serialize};

use crate::error::{SnapshotError, SnapshotResult};

/// Physical quantity stored in a snapshot tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    #[serde(rename = "conc")]
    Concentration,
    #[serde(rename = "temp")]
    Temperature,
    #[serde(rename = "pressure")]
    Pressure,
}

impl FieldKind {
    /// Processing order within a gas tree.
    pub const ALL: [FieldKind; 3] = [
        FieldKind::Concentration,
        FieldKind::Temperature,
        FieldKind::Pressure,
    ];

    /// Subdirectory name under `gas<N>/`.
    pub fn dir_name(&self) -> &'static str {
        match self {
            FieldKind::Concentration => "conc",
            FieldKind::Temperature => "temp",
            FieldKind::Pressure => "pressure",
        }
    }

    /// Heat-map bounds used for this field.
    pub fn default_scale(&self) -> ColorScale {
        match self {
            FieldKind::Concentration => ColorScale::new(0.82, 1.1),
            FieldKind::Temperature => ColorScale::new(0.8, 1.0),
            FieldKind::Pressure => ColorScale::new(0.64, 1.1),
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Closed value range mapped onto the colormap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Position of `value` on the scale, clamped to [0, 1].
    ///
    /// NaN stays NaN so callers can tell masked cells apart.
    pub fn normalize(&self, value: f64) -> f64 {
        if value.is_nan() {
            return f64::NAN;
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    pub fn validate(&self) -> SnapshotResult<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min >= self.max {
            return Err(SnapshotError::config(format!(
                "color scale [{}, {}] must be finite with min < max",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// One row of the render table: which directory to read and how to color it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub scale: ColorScale,
}

impl FieldSpec {
    pub fn new(kind: FieldKind, scale: ColorScale) -> Self {
        Self { kind, scale }
    }

    /// The built-in table for all three field kinds.
    pub fn defaults() -> Vec<FieldSpec> {
        FieldKind::ALL
            .into_iter()
            .map(|kind| FieldSpec::new(kind, kind.default_scale()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_order_and_bounds() {
        let table = FieldSpec::defaults();
        let dirs: Vec<_> = table.iter().map(|s| s.kind.dir_name()).collect();
        assert_eq!(dirs, vec!["conc", "temp", "pressure"]);

        assert_eq!(table[0].scale, ColorScale::new(0.82, 1.1));
        assert_eq!(table[1].scale, ColorScale::new(0.8, 1.0));
        assert_eq!(table[2].scale, ColorScale::new(0.64, 1.1));
    }

    #[test]
    fn test_normalize_clamps() {
        let scale = ColorScale::new(0.8, 1.0);
        assert_eq!(scale.normalize(0.5), 0.0);
        assert_eq!(scale.normalize(0.8), 0.0);
        assert_eq!(scale.normalize(1.0), 1.0);
        assert_eq!(scale.normalize(7.0), 1.0);
        assert!((scale.normalize(0.9) - 0.5).abs() < 1e-12);
        assert!(scale.normalize(f64::NAN).is_nan());
    }

    #[test]
    fn test_validate() {
        assert!(ColorScale::new(0.64, 1.1).validate().is_ok());
        assert!(ColorScale::new(1.0, 1.0).validate().is_err());
        assert!(ColorScale::new(1.1, 0.64).validate().is_err());
        assert!(ColorScale::new(f64::NAN, 1.0).validate().is_err());
    }
}
