//! Common types shared by the snapshot renderer crates.
//!
//! - Grid shape and snapshot loading (flat little-endian `f64` dumps)
//! - Field kinds and their fixed color scales
//! - The on-disk layout of gas data trees

pub mod error;
pub mod field;
pub mod grid;
pub mod layout;

pub use error::{SnapshotError, SnapshotResult};
pub use field::{ColorScale, FieldKind, FieldSpec};
pub use grid::{Grid, GridShape};
pub use layout::{snapshot_indices, SnapshotLayout, SnapshotRef};
