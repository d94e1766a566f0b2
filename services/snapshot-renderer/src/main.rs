//! Snapshot renderer.
//!
//! Renders gas simulation snapshots as heat-map figures with:
//! - Fixed per-field color scales (concentration, temperature, pressure)
//! - Black contour lines and a colorbar
//! - One `pic/<i>.png` per input `<i>.bin`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use snapshot_renderer::{ConfigOverrides, RenderConfig, SnapshotRenderer};

#[derive(Parser, Debug)]
#[command(name = "snapshot-renderer")]
#[command(about = "Render gas simulation snapshots as heat-map PNG figures")]
struct Args {
    /// YAML configuration file
    #[arg(long, env = "SNAPSHOT_RENDER_CONFIG")]
    config: Option<PathBuf>,

    /// Directory containing the gas<N>/ trees
    #[arg(long, env = "SNAPSHOT_DATA_ROOT")]
    data_root: Option<PathBuf>,

    /// Number of gas trees to render
    #[arg(long, env = "SNAPSHOT_GAS_COUNT")]
    gas_count: Option<usize>,

    /// Exclusive upper bound on snapshot indices
    #[arg(long, env = "SNAPSHOT_MAX_FILES")]
    max_snapshots: Option<usize>,

    /// Stride between rendered snapshot indices
    #[arg(long, env = "SNAPSHOT_STEP")]
    step: Option<usize>,

    /// Render snapshots in parallel
    #[arg(long, env = "SNAPSHOT_PARALLEL")]
    parallel: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            data_root: self.data_root.clone(),
            gas_count: self.gas_count,
            max_snapshots: self.max_snapshots,
            step: self.step,
            parallel: self.parallel.then_some(true),
        }
    }
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing; stdout is reserved for progress lines
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let base = match &args.config {
        Some(path) => RenderConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RenderConfig::default(),
    };
    let config = base.with_overrides(args.overrides());
    config.validate().context("Invalid render configuration")?;

    info!(
        data_root = %config.data_root.display(),
        rows = config.grid.rows,
        columns = config.grid.columns,
        "Starting snapshot renderer"
    );

    let renderer = SnapshotRenderer::from_config(&config);
    let summary = renderer
        .render_all(config.gas_count, config.max_snapshots, config.step)
        .context("Snapshot rendering failed")?;

    info!(images = summary.images.len(), "Done");
    Ok(())
}
