//! Snapshot renderer service.
//!
//! Walks `<root>/gas<g>/{conc,temp,pressure}/<i>.bin` and writes a heat-map
//! figure for each snapshot to the matching `pic/<i>.png`.

pub mod config;
pub mod pipeline;

pub use config::{ConfigOverrides, RenderConfig};
pub use pipeline::{
    progress_line, ProgressSink, RenderSummary, RenderedSnapshot, SnapshotRenderer, StdoutProgress,
};
