//! On-disk layout of simulation output.
//!
//! ```text
//! <root>/gas<g>/<field>/<i>.bin        input snapshot
//! <root>/gas<g>/<field>/pic/<i>.png    rendered figure
//! ```

use std::path::{Path, PathBuf};

use crate::error::{SnapshotError, SnapshotResult};
use crate::field::FieldKind;

/// Name of the per-field image directory.
pub const PICTURE_DIR: &str = "pic";

/// Identifies one (gas, field kind, snapshot index) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotRef {
    pub gas: usize,
    pub kind: FieldKind,
    pub index: usize,
}

impl SnapshotRef {
    pub fn new(gas: usize, kind: FieldKind, index: usize) -> Self {
        Self { gas, kind, index }
    }
}

/// Resolves snapshot and image paths below a data root.
#[derive(Debug, Clone)]
pub struct SnapshotLayout {
    root: PathBuf,
}

impl SnapshotLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn gas_dir(&self, gas: usize) -> PathBuf {
        self.root.join(format!("gas{gas}"))
    }

    pub fn field_dir(&self, gas: usize, kind: FieldKind) -> PathBuf {
        self.gas_dir(gas).join(kind.dir_name())
    }

    pub fn picture_dir(&self, gas: usize, kind: FieldKind) -> PathBuf {
        self.field_dir(gas, kind).join(PICTURE_DIR)
    }

    pub fn input_path(&self, snapshot: SnapshotRef) -> PathBuf {
        self.field_dir(snapshot.gas, snapshot.kind)
            .join(format!("{}.bin", snapshot.index))
    }

    pub fn output_path(&self, snapshot: SnapshotRef) -> PathBuf {
        self.picture_dir(snapshot.gas, snapshot.kind)
            .join(format!("{}.png", snapshot.index))
    }
}

/// Snapshot indices `0, step, 2*step, ...` below `max_snapshots`.
pub fn snapshot_indices(
    max_snapshots: usize,
    step: usize,
) -> SnapshotResult<std::iter::StepBy<std::ops::Range<usize>>> {
    if step == 0 {
        return Err(SnapshotError::InvalidStep);
    }
    Ok((0..max_snapshots).step_by(step))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let layout = SnapshotLayout::new("/data/out");
        let snap = SnapshotRef::new(1, FieldKind::Pressure, 12);

        assert_eq!(
            layout.input_path(snap),
            PathBuf::from("/data/out/gas1/pressure/12.bin")
        );
        assert_eq!(
            layout.output_path(snap),
            PathBuf::from("/data/out/gas1/pressure/pic/12.png")
        );
        assert_eq!(
            layout.field_dir(0, FieldKind::Concentration),
            PathBuf::from("/data/out/gas0/conc")
        );
    }

    #[test]
    fn test_snapshot_indices_stride() {
        let got: Vec<_> = snapshot_indices(10, 3).unwrap().collect();
        assert_eq!(got, vec![0, 3, 6, 9]);

        let got: Vec<_> = snapshot_indices(9, 3).unwrap().collect();
        assert_eq!(got, vec![0, 3, 6]);

        assert_eq!(snapshot_indices(0, 1).unwrap().count(), 0);
    }

    #[test]
    fn test_snapshot_indices_count_is_ceiling() {
        for max in 0..25 {
            for step in 1..7 {
                let expected = (max + step - 1) / step;
                assert_eq!(snapshot_indices(max, step).unwrap().count(), expected);
            }
        }
    }

    #[test]
    fn test_snapshot_indices_zero_step() {
        assert!(matches!(snapshot_indices(5, 0), Err(SnapshotError::InvalidStep)));
    }
}
