//! Fixed-shape snapshot grids.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SnapshotError, SnapshotResult};

/// Size in bytes of one stored sample.
pub const SAMPLE_BYTES: usize = std::mem::size_of::<f64>();

/// Effective shape of every snapshot grid.
///
/// The simulation writes its 130x70 domain transposed, so files are read as
/// 70 rows of 130 columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridShape {
    pub rows: usize,
    pub columns: usize,
}

impl GridShape {
    /// Row count of the simulation output.
    pub const DEFAULT_ROWS: usize = 70;
    /// Column count of the simulation output.
    pub const DEFAULT_COLUMNS: usize = 130;

    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.columns
    }

    /// Check if grid is empty.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }

    /// Exact byte length of a snapshot file with this shape.
    pub fn byte_len(&self) -> usize {
        self.len() * SAMPLE_BYTES
    }
}

impl Default for GridShape {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROWS, Self::DEFAULT_COLUMNS)
    }
}

/// One snapshot of a scalar field, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    shape: GridShape,
    values: Vec<f64>,
}

impl Grid {
    /// Build a grid from row-major values.
    ///
    /// Fails with [`SnapshotError::Shape`] when the value count does not
    /// match the shape.
    pub fn from_values(shape: GridShape, values: Vec<f64>) -> SnapshotResult<Self> {
        if values.len() != shape.len() {
            return Err(SnapshotError::Shape {
                path: "<memory>".into(),
                rows: shape.rows,
                columns: shape.columns,
                expected_bytes: shape.byte_len(),
                actual_bytes: values.len() * SAMPLE_BYTES,
            });
        }
        Ok(Self { shape, values })
    }

    /// Decode a raw little-endian `f64` dump into a grid.
    ///
    /// The byte length must be exactly `rows * columns * 8`.
    pub fn from_le_bytes(shape: GridShape, bytes: &[u8], path: &Path) -> SnapshotResult<Self> {
        if bytes.len() != shape.byte_len() {
            return Err(SnapshotError::Shape {
                path: path.to_path_buf(),
                rows: shape.rows,
                columns: shape.columns,
                expected_bytes: shape.byte_len(),
                actual_bytes: bytes.len(),
            });
        }

        let values = bytes
            .chunks_exact(SAMPLE_BYTES)
            .map(|chunk| {
                let mut raw = [0u8; SAMPLE_BYTES];
                raw.copy_from_slice(chunk);
                f64::from_le_bytes(raw)
            })
            .collect();

        Ok(Self { shape, values })
    }

    /// Read a snapshot file from disk.
    pub fn load(path: &Path, shape: GridShape) -> SnapshotResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| SnapshotError::io(path, e))?;
        debug!(path = %path.display(), bytes = bytes.len(), "Read snapshot");
        Self::from_le_bytes(shape, &bytes, path)
    }

    /// Replace every cell that compares equal to `0.0` with NaN.
    ///
    /// Zero is the simulation's marker for cells outside the domain. The
    /// comparison is exact: tiny positive values stay visible.
    ///
    /// Returns the number of masked cells.
    pub fn mask_zeros(&mut self) -> usize {
        let mut masked = 0;
        for value in self.values.iter_mut() {
            if *value == 0.0 {
                *value = f64::NAN;
                masked += 1;
            }
        }
        masked
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    pub fn columns(&self) -> usize {
        self.shape.columns
    }

    /// Row-major cell values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at (row, column), if in range.
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if row >= self.shape.rows || column >= self.shape.columns {
            return None;
        }
        self.values.get(row * self.shape.columns + column).copied()
    }

    /// Minimum and maximum over non-NaN cells, or `None` when every cell is masked.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
