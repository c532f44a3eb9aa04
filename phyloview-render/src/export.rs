//! File exports: author and strain TSV, Newick, and the composed SVG.
//!
//! Every writer goes through a [`FileSink`] and returns the [`Notification`]
//! to show once the file is written.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::compose::{compose_export, join_names, MapTiles, PanelSources};
use crate::panels::{PanelLayout, DEFAULT_PADDING};
use crate::Notification;
use phyloview_core::{author_table, strain_table, to_newick, DistanceMeasure, Metadata, TreeNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeType {
    Text,
    Csv,
    Tsv,
    Svg,
}

impl MimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::Text => "text/plain;charset=utf-8;",
            MimeType::Csv => "text/csv;charset=utf-8;",
            MimeType::Tsv => "text/tab-separated-values;charset=utf-8;",
            MimeType::Svg => "image/svg+xml;charset=utf-8",
        }
    }
}

/// Destination of exported files
pub trait FileSink {
    fn write(&mut self, filename: &str, mime: MimeType, content: &str) -> Result<()>;
}

/// Writes each file into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl FileSink for DirectorySink {
    fn write(&mut self, filename: &str, mime: MimeType, content: &str) -> Result<()> {
        let path = self.path_of(filename);
        fs::write(&path, content)
            .with_context(|| format!("Failed to write export file: {}", path.display()))?;
        log::info!("Wrote {} ({}, {} bytes)", path.display(), mime.as_str(), content.len());
        Ok(())
    }
}

/// Keeps written files in memory; used by tests and dry runs
#[derive(Debug, Default)]
pub struct MemorySink {
    pub files: BTreeMap<String, (MimeType, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self, filename: &str) -> Option<&str> {
        self.files.get(filename).map(|(_, c)| c.as_str())
    }
}

impl FileSink for MemorySink {
    fn write(&mut self, filename: &str, mime: MimeType, content: &str) -> Result<()> {
        self.files.insert(filename.to_string(), (mime, content.to_string()));
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("map tiles could not be fetched: {0}")]
    MapTiles(String),
    #[error(transparent)]
    Compose(#[from] crate::compose::ComposeError),
}

/// Source of the rendered map tiles for the SVG export
pub trait MapTileProvider {
    fn fetch(&mut self) -> std::result::Result<MapTiles, String>;
}

impl MapTileProvider for MapTiles {
    fn fetch(&mut self) -> std::result::Result<MapTiles, String> {
        Ok(self.clone())
    }
}

impl<F> MapTileProvider for F
where
    F: FnMut() -> std::result::Result<MapTiles, String>,
{
    fn fetch(&mut self) -> std::result::Result<MapTiles, String> {
        self()
    }
}

/// Options of the SVG export
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgOptions {
    pub layout: PanelLayout,
    pub padding: f64,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            layout: PanelLayout::Grid,
            padding: DEFAULT_PADDING,
        }
    }
}

pub fn author_tsv(sink: &mut dyn FileSink, prefix: &str, metadata: &Metadata, nodes: &[&TreeNode]) -> Result<Notification> {
    let filename = format!("{}_authors.tsv", prefix);
    sink.write(&filename, MimeType::Tsv, &author_table(metadata, nodes))?;
    Ok(Notification::info("Author metadata exported").with_details(filename))
}

pub fn strain_tsv(sink: &mut dyn FileSink, prefix: &str, nodes: &[&TreeNode], raw_attrs: &[String]) -> Result<Notification> {
    let filename = format!("{}_metadata.tsv", prefix);
    sink.write(&filename, MimeType::Tsv, &strain_table(nodes, raw_attrs))?;
    Ok(Notification::info(format!("Metadata exported to {}", filename)))
}

/// Divergence tree as `<prefix>_tree.nwk`, or the time tree as
/// `<prefix>_timetree.nwk` when `temporal` is set
pub fn newick(sink: &mut dyn FileSink, prefix: &str, root: &TreeNode, temporal: bool) -> Result<Notification> {
    let (measure, filename, label) = if temporal {
        (DistanceMeasure::NumDate, format!("{}_timetree.nwk", prefix), "TimeTree")
    } else {
        (DistanceMeasure::Divergence, format!("{}_tree.nwk", prefix), "Tree")
    };
    let text = to_newick(root, measure).with_context(|| format!("Failed to serialise {}", label))?;
    sink.write(&filename, MimeType::Text, &text)?;
    Ok(Notification::info(format!("{} written to {}", label, filename)))
}

/// Compose the visible panels and write `<prefix>.svg`. Map tiles are only
/// fetched when the map panel is requested; a fetch failure aborts the export.
pub fn svg(
    sink: &mut dyn FileSink,
    prefix: &str,
    sources: &PanelSources,
    tiles: Option<&mut dyn MapTileProvider>,
    text_lines: &[String],
    options: &SvgOptions,
) -> Result<Notification> {
    let fetched = match (sources.wants_map(), tiles) {
        (true, Some(provider)) => match provider.fetch() {
            Ok(tiles) => Some(tiles),
            Err(e) => {
                log::warn!("getMapTiles failed: {}", e);
                return Err(ExportError::MapTiles(e).into());
            }
        },
        _ => None,
    };

    let composed = compose_export(sources, fetched.as_ref(), options.layout, text_lines, options.padding)
        .map_err(ExportError::from)?;

    let filename = format!("{}.svg", prefix);
    sink.write(&filename, MimeType::Svg, &composed.document)?;

    if composed.is_partial() {
        Ok(Notification::warning("Vector image saved").with_details(format!(
            "Saved to {}, however there were errors with {}",
            filename,
            join_names(&composed.errors)
        )))
    } else {
        Ok(Notification::info("Vector image saved").with_details(filename))
    }
}
