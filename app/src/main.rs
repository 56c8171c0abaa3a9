mod config;

use std::path::PathBuf;

use anyhow::bail;
use heightfield::{HeightGrid, noise_field};
use heightfield_export::export_all;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::RunConfig;

// Usage: heightfield [run.ron]
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => RunConfig::load(&path)?,
        None => RunConfig::without_file(),
    };
    let params = &config.terrain;
    params.validate()?;

    if config.outputs.is_empty() {
        info!("no output targets requested, nothing to do");
        return Ok(());
    }

    let field = noise_field(params);
    let grid = HeightGrid::build(&field, params)?;
    info!(
        seed = params.seed,
        width = grid.width(),
        height = grid.height(),
        min = grid.min(),
        max = grid.max(),
        "height grid ready"
    );

    let report = export_all(&grid, params, &config.outputs);
    let failed = report.failures().count();
    for (target, path, err) in report.failures() {
        error!(%target, path = %path.display(), "{err:#}");
    }
    if failed > 0 {
        bail!("{failed} of {} output targets failed", report.outcomes.len());
    }
    info!(targets = report.outcomes.len(), "all outputs written");
    Ok(())
}
