//! Grid command implementation - compute gridlines for a pair of axis scales

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use super::read_json;
use crate::config::Config;
use crate::error::CliError;
use crate::GridFormat;
use phyloview_core::{AxisScale, DistanceMeasure, LayoutMode};
use phyloview_render::{compute_grid, grid_to_svg, GridParams};

/// Scales of the rendered tree as read from `--scales`
#[derive(Debug, Deserialize)]
pub struct ScalesFile {
    pub x: AxisScale,
    pub y: AxisScale,
    #[serde(default)]
    pub root_depth: Option<f64>,
}

#[allow(clippy::too_many_arguments)]
pub fn execute(
    config: &Config,
    scales: PathBuf,
    layout: Option<LayoutMode>,
    root_depth: Option<f64>,
    distance: Option<DistanceMeasure>,
    format: GridFormat,
    hidden: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    let input: ScalesFile = read_json(&scales)?;

    let layout = match layout {
        Some(layout) => layout,
        None => config
            .general
            .layout
            .parse()
            .map_err(|e| CliError::config(format!("general.layout: {}", e)))?,
    };
    let distance_measure = match distance {
        Some(distance) => distance,
        None => config
            .general
            .distance_measure
            .parse()
            .map_err(|e| CliError::config(format!("general.distance_measure: {}", e)))?,
    };

    let params = GridParams {
        root_depth: root_depth.or(input.root_depth).unwrap_or(0.0),
        distance_measure,
        minor_ticks: config.grid.minor_ticks,
        minor_ticks_time_tree: config.grid.minor_ticks_time_tree,
    };
    log::info!("Computing {} grid ({} scale)", layout, distance_measure);

    let mut grid = compute_grid(&input.x, &input.y, layout, &params).map_err(CliError::from)?;
    if hidden {
        grid.hide();
    }
    log::info!(
        "{} major and {} minor gridlines ({} visible major)",
        grid.major_points.len(),
        grid.minor_points.len(),
        grid.visible_major().count()
    );

    let rendered = match format {
        GridFormat::Svg => grid_to_svg(&grid, &config.grid.style),
        GridFormat::Json => serde_json::to_string_pretty(&grid).context("Failed to serialize grid")?,
    };

    match out {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write grid output: {}", path.display()))?;
            log::info!("Grid written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
