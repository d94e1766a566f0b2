//! Image rendering for gas snapshot grids.
//!
//! Implements the pieces of a snapshot figure:
//! - Gradient heat map with nearest-neighbor cell scaling
//! - Contour lines (marching squares)
//! - Colorbar and axis ticks
//! - PNG encoding

pub mod colorbar;
pub mod contour;
pub mod error;
pub mod figure;
pub mod glyphs;
pub mod gradient;
pub mod png;
pub mod ticks;

pub use error::RenderError;
pub use figure::{render_figure, Figure, FigureLayout, FigureStyle};
