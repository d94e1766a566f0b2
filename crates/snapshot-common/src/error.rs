//! Error types for snapshot loading and rendering.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using SnapshotError.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors that abort a render run.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Reading an input file or writing an output image failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot does not hold exactly rows x columns doubles.
    #[error("cannot reshape {path} ({actual_bytes} bytes) into {rows}x{columns} grid of f64 ({expected_bytes} bytes)")]
    Shape {
        path: PathBuf,
        rows: usize,
        columns: usize,
        expected_bytes: usize,
        actual_bytes: usize,
    },

    /// A zero stride would never advance the snapshot index.
    #[error("snapshot step must be greater than zero")]
    InvalidStep,

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Figure composition or PNG encoding failed.
    #[error("rendering failed: {0}")]
    Render(String),
}

impl SnapshotError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a Render error.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
