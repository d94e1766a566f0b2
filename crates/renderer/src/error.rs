//! Rendering errors.

use thiserror::Error;

/// Errors produced while composing or encoding a figure.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The canvas could not be allocated (zero or oversized dimensions).
    #[error("cannot allocate {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    /// The grid does not fit the requested layout.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// PNG compression failed.
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] std::io::Error),
}
