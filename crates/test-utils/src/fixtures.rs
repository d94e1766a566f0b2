//! On-disk fixtures shaped like simulation output.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::generators::encode_snapshot;

/// Field subdirectories written by the simulation, in processing order.
pub const FIELD_DIRS: [&str; 3] = ["conc", "temp", "pressure"];

/// A temporary `<root>/gas<g>/<field>/...` tree, removed on drop.
pub struct SnapshotTree {
    dir: TempDir,
}

impl SnapshotTree {
    /// Create an empty data root.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Data root to hand to the renderer.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn field_dir(&self, gas: usize, field: &str) -> PathBuf {
        self.root().join(format!("gas{gas}")).join(field)
    }

    pub fn picture_dir(&self, gas: usize, field: &str) -> PathBuf {
        self.field_dir(gas, field).join("pic")
    }

    /// Write `values` as `<index>.bin` and return its path.
    ///
    /// Creates the field directory but not its `pic/` subdirectory.
    pub fn write_snapshot(
        &self,
        gas: usize,
        field: &str,
        index: usize,
        values: &[f64],
    ) -> io::Result<PathBuf> {
        self.write_raw(gas, field, index, &encode_snapshot(values))
    }

    /// Write arbitrary bytes as `<index>.bin`, e.g. a truncated snapshot.
    pub fn write_raw(
        &self,
        gas: usize,
        field: &str,
        index: usize,
        bytes: &[u8],
    ) -> io::Result<PathBuf> {
        let dir = self.field_dir(gas, field);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{index}.bin"));
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Create `pic/` for every field of `gas`.
    pub fn create_picture_dirs(&self, gas: usize) -> io::Result<()> {
        for field in FIELD_DIRS {
            fs::create_dir_all(self.picture_dir(gas, field))?;
        }
        Ok(())
    }

    /// Populate `gas_count` complete trees with `snapshots` files per field.
    ///
    /// `make` receives (gas, field, index) and returns the grid values.
    pub fn populate<F>(&self, gas_count: usize, snapshots: usize, mut make: F) -> io::Result<()>
    where
        F: FnMut(usize, &str, usize) -> Vec<f64>,
    {
        for gas in 0..gas_count {
            for field in FIELD_DIRS {
                for index in 0..snapshots {
                    self.write_snapshot(gas, field, index, &make(gas, field, index))?;
                }
            }
            self.create_picture_dirs(gas)?;
        }
        Ok(())
    }

    /// Sorted file names inside a field's `pic/` directory.
    pub fn rendered_files(&self, gas: usize, field: &str) -> io::Result<Vec<String>> {
        let dir = self.picture_dir(gas, field);
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populate_layout() {
        let tree = SnapshotTree::new().unwrap();
        tree.populate(2, 3, |_, _, _| vec![1.0; 4]).unwrap();

        for gas in 0..2 {
            for field in FIELD_DIRS {
                for index in 0..3 {
                    let path = tree.field_dir(gas, field).join(format!("{index}.bin"));
                    assert_eq!(fs::metadata(&path).unwrap().len(), 32);
                }
                assert!(tree.picture_dir(gas, field).is_dir());
                assert!(tree.rendered_files(gas, field).unwrap().is_empty());
            }
        }
    }
}
