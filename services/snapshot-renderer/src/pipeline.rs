//! Batch rendering of snapshot trees.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use rayon::prelude::*;
use renderer::{render_figure, FigureStyle};
use snapshot_common::{
    snapshot_indices, FieldSpec, Grid, GridShape, SnapshotError, SnapshotLayout, SnapshotRef,
    SnapshotResult,
};
use tracing::{debug, info};

use crate::config::RenderConfig;

/// Outcome of a completed render run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSummary {
    /// Written images in processing order.
    pub images: Vec<PathBuf>,
    /// Cells masked as "no data" across all snapshots.
    pub masked_cells: usize,
}

/// One rendered snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSnapshot {
    pub path: PathBuf,
    pub masked_cells: usize,
}

/// Receives one report per written image.
pub trait ProgressSink: fmt::Debug + Send + Sync {
    fn report(&self, index: usize, total: usize);
}

/// Text of a progress report: `<index> of <total>`.
pub fn progress_line(index: usize, total: usize) -> String {
    format!("{} of {}", index, total)
}

/// Prints progress lines to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutProgress;

impl ProgressSink for StdoutProgress {
    fn report(&self, index: usize, total: usize) {
        println!("{}", progress_line(index, total));
    }
}

/// Renders every requested snapshot below a data root.
#[derive(Debug, Clone)]
pub struct SnapshotRenderer {
    layout: SnapshotLayout,
    shape: GridShape,
    fields: Vec<FieldSpec>,
    style: FigureStyle,
    parallel: bool,
    progress: Arc<dyn ProgressSink>,
}

impl SnapshotRenderer {
    /// Renderer with the default grid shape, field table and figure style.
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            layout: SnapshotLayout::new(data_root),
            shape: GridShape::default(),
            fields: FieldSpec::defaults(),
            style: FigureStyle::default(),
            parallel: false,
            progress: Arc::new(StdoutProgress),
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.data_root.clone())
            .with_shape(config.grid)
            .with_fields(config.field_specs())
            .with_parallel(config.parallel)
    }

    pub fn with_shape(mut self, shape: GridShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_style(mut self, style: FigureStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Replace the stdout progress reporter.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn layout(&self) -> &SnapshotLayout {
        &self.layout
    }

    /// Render indices `0, step, 2*step, ...` below `max_snapshots` for every
    /// field of gases `0..gas_count`.
    ///
    /// Reports `<index> of <max_snapshots>` after each written image. Work is
    /// generated lazily; the first failure aborts the run and images already
    /// written stay on disk.
    pub fn render_all(
        &self,
        gas_count: usize,
        max_snapshots: usize,
        step: usize,
    ) -> SnapshotResult<RenderSummary> {
        let indices = snapshot_indices(max_snapshots, step)?;

        info!(
            root = %self.layout.root().display(),
            gas_count,
            max_snapshots,
            step,
            parallel = self.parallel,
            "Rendering snapshots"
        );

        let render_job = |snapshot: SnapshotRef, spec: &FieldSpec| {
            let rendered = self.render_snapshot(snapshot, spec)?;
            self.progress.report(snapshot.index, max_snapshots);
            Ok::<_, SnapshotError>(rendered)
        };

        let rendered: Vec<RenderedSnapshot> = if self.parallel {
            (0..gas_count)
                .into_par_iter()
                .flat_map_iter(|gas| {
                    let indices = indices.clone();
                    self.fields.iter().flat_map(move |spec| {
                        indices
                            .clone()
                            .map(move |index| (SnapshotRef::new(gas, spec.kind, index), spec))
                    })
                })
                .map(|(snapshot, spec)| render_job(snapshot, spec))
                .collect::<SnapshotResult<_>>()?
        } else {
            let mut rendered = Vec::new();
            for gas in 0..gas_count {
                for spec in &self.fields {
                    for index in indices.clone() {
                        rendered.push(render_job(SnapshotRef::new(gas, spec.kind, index), spec)?);
                    }
                }
            }
            rendered
        };

        let summary = RenderSummary {
            masked_cells: rendered.iter().map(|r| r.masked_cells).sum(),
            images: rendered.into_iter().map(|r| r.path).collect(),
        };

        info!(
            images = summary.images.len(),
            masked_cells = summary.masked_cells,
            "Finished rendering"
        );

        Ok(summary)
    }

    /// Load, mask, draw and write a single snapshot.
    ///
    /// The output directory must already exist.
    pub fn render_snapshot(
        &self,
        snapshot: SnapshotRef,
        spec: &FieldSpec,
    ) -> SnapshotResult<RenderedSnapshot> {
        let input = self.layout.input_path(snapshot);
        let output = self.layout.output_path(snapshot);

        let mut grid = Grid::load(&input, self.shape)?;
        let masked_cells = grid.mask_zeros();

        let figure = render_figure(&grid, &spec.scale, &self.style)
            .map_err(|e| SnapshotError::render(format!("{}: {}", input.display(), e)))?;
        let png = figure
            .encode_png()
            .map_err(|e| SnapshotError::render(format!("{}: {}", input.display(), e)))?;

        std::fs::write(&output, &png).map_err(|e| SnapshotError::io(&output, e))?;

        debug!(
            gas = snapshot.gas,
            field = %snapshot.kind,
            index = snapshot.index,
            masked_cells,
            bytes = png.len(),
            path = %output.display(),
            "Wrote snapshot image"
        );

        Ok(RenderedSnapshot {
            path: output,
            masked_cells,
        })
    }
}
