//! SVG command implementation - compose a snapshot of panels into one figure

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

use super::{read_json, report};
use crate::config::Config;
use phyloview_render::export::{self, SvgOptions};
use phyloview_render::{DirectorySink, MapTileProvider, MapTiles, PanelLayout, PanelSources};

/// Serialized view state: one markup string per visible panel
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub panels: PanelSources,
    pub map_tiles: Option<MapTiles>,
    pub caption: Vec<String>,
}

pub fn execute(
    config: &Config,
    snapshot: PathBuf,
    out_dir: PathBuf,
    prefix: Option<String>,
    layout: Option<PanelLayout>,
    caption: Vec<String>,
) -> Result<()> {
    let mut snapshot: Snapshot = read_json(&snapshot)?;
    let requested = snapshot.panels.requested();
    log::info!(
        "Composing {} panel(s): {}",
        requested.len(),
        requested.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    );

    let caption = if !caption.is_empty() {
        caption
    } else if !snapshot.caption.is_empty() {
        std::mem::take(&mut snapshot.caption)
    } else {
        config.export.caption.clone()
    };
    let options = SvgOptions {
        layout: layout.unwrap_or(config.export.panel_layout),
        padding: config.export.padding,
    };
    let prefix = prefix.unwrap_or_else(|| config.export.prefix.clone());

    let mut sink = DirectorySink::new(&out_dir)?;
    let tiles = snapshot.map_tiles.as_mut().map(|t| t as &mut dyn MapTileProvider);
    let notification = export::svg(&mut sink, &prefix, &snapshot.panels, tiles, &caption, &options)?;
    report(&notification);

    Ok(())
}
