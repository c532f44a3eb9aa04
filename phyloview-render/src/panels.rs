//! Serialized panel parsing and canvas layout for multi-panel SVG export.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

use regex::Regex;

/// Gap between panels and around the canvas edge
pub const DEFAULT_PADDING: f64 = 50.0;
pub const TEXT_LINE_HEIGHT: f64 = 36.0;
pub const TEXT_BLOCK_BASE: f64 = 20.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PanelError {
    #[error("not a serialized <svg> or <g> element")]
    NotSvg,
    #[error("opening tag carries no width/height")]
    MissingDimensions,
    #[error("invalid {attr} value {value:?}")]
    InvalidNumber { attr: &'static str, value: String },
    #[error("panel pattern failed to compile: {0}")]
    Pattern(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelId {
    #[serde(rename = "tree")]
    Tree,
    #[serde(rename = "mapTiles")]
    MapTiles,
    #[serde(rename = "mapD3")]
    MapD3,
    #[serde(rename = "entropy")]
    Entropy,
    #[serde(rename = "frequencies")]
    Frequencies,
}

impl PanelId {
    pub const ALL: [PanelId; 5] = [
        PanelId::Tree,
        PanelId::MapTiles,
        PanelId::MapD3,
        PanelId::Entropy,
        PanelId::Frequencies,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelId::Tree => "tree",
            PanelId::MapTiles => "mapTiles",
            PanelId::MapD3 => "mapD3",
            PanelId::Entropy => "entropy",
            PanelId::Frequencies => "frequencies",
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translation applied to the vector map overlay so it lines up with the tiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PanOffsets {
    pub x: f64,
    pub y: f64,
}

/// One panel of the export canvas. `x`/`y` are filled in by [`position_panels`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Panel {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Raw `viewBox` components, kept as strings
    pub viewbox: Option<[String; 4]>,
    pub inner: String,
    pub pan_offsets: Option<PanOffsets>,
}

impl Panel {
    pub fn new(width: f64, height: f64, inner: impl Into<String>) -> Self {
        Self {
            width,
            height,
            inner: inner.into(),
            ..Self::default()
        }
    }
}

fn cached(cell: &'static OnceLock<Result<Regex, regex::Error>>, pattern: &str) -> Result<&'static Regex, PanelError> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|e| PanelError::Pattern(e.to_string()))
}

fn outer_re() -> Result<&'static Regex, PanelError> {
    static RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    cached(&RE, r"(?s)^(<s?v?g.+?>)(.+)</s?v?g>$")
}

fn dims_re() -> Result<&'static Regex, PanelError> {
    static RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    cached(&RE, r#"(?s)width="([0-9.]+)".+height="([0-9.]+)""#)
}

fn viewbox_re() -> Result<&'static Regex, PanelError> {
    static RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    cached(&RE, r#"viewBox="([0-9-]+)\s([0-9-]+)\s([0-9-]+)\s([0-9-]+)""#)
}

fn parse_dimension(attr: &'static str, value: &str) -> Result<f64, PanelError> {
    value.parse().map_err(|_| PanelError::InvalidNumber {
        attr,
        value: value.to_string(),
    })
}

/// Split a serialized `<svg>`/`<g>` element into its size, optional viewBox
/// and inner markup. Dimensions are read from the opening tag only.
pub fn parse_panel(serialized: &str) -> Result<Panel, PanelError> {
    let caps = outer_re()?.captures(serialized).ok_or(PanelError::NotSvg)?;
    let open_tag = &caps[1];
    let inner = caps[2].to_string();

    let dims = dims_re()?
        .captures(open_tag)
        .ok_or(PanelError::MissingDimensions)?;
    let width = parse_dimension("width", &dims[1])?;
    let height = parse_dimension("height", &dims[2])?;

    let viewbox = viewbox_re()?.captures(open_tag).map(|vb| {
        [
            vb[1].to_string(),
            vb[2].to_string(),
            vb[3].to_string(),
            vb[4].to_string(),
        ]
    });

    Ok(Panel {
        width,
        height,
        viewbox,
        inner,
        ..Panel::default()
    })
}

/// Arrangement of the tree and map panels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelLayout {
    /// Tree and map side by side
    #[default]
    Grid,
    /// Map below the tree
    #[serde(alias = "full")]
    Stacked,
}

impl fmt::Display for PanelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelLayout::Grid => write!(f, "grid"),
            PanelLayout::Stacked => write!(f, "stacked"),
        }
    }
}

impl FromStr for PanelLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grid" => Ok(PanelLayout::Grid),
            "stacked" | "full" => Ok(PanelLayout::Stacked),
            other => Err(format!("unknown panel layout '{}'", other)),
        }
    }
}

/// The panels present in one export, in canvas order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelSet {
    pub tree: Option<Panel>,
    pub map_tiles: Option<Panel>,
    pub map_d3: Option<Panel>,
    pub entropy: Option<Panel>,
    pub frequencies: Option<Panel>,
}

impl PanelSet {
    pub fn get(&self, id: PanelId) -> Option<&Panel> {
        match id {
            PanelId::Tree => self.tree.as_ref(),
            PanelId::MapTiles => self.map_tiles.as_ref(),
            PanelId::MapD3 => self.map_d3.as_ref(),
            PanelId::Entropy => self.entropy.as_ref(),
            PanelId::Frequencies => self.frequencies.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, id: PanelId) -> &mut Option<Panel> {
        match id {
            PanelId::Tree => &mut self.tree,
            PanelId::MapTiles => &mut self.map_tiles,
            PanelId::MapD3 => &mut self.map_d3,
            PanelId::Entropy => &mut self.entropy,
            PanelId::Frequencies => &mut self.frequencies,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PanelId, &Panel)> {
        PanelId::ALL
            .into_iter()
            .filter_map(move |id| self.get(id).map(|p| (id, p)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Panel> {
        [
            &mut self.tree,
            &mut self.map_tiles,
            &mut self.map_d3,
            &mut self.entropy,
            &mut self.frequencies,
        ]
        .into_iter()
        .filter_map(Option::as_mut)
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn has_map(&self) -> bool {
        self.map_tiles.is_some() && self.map_d3.is_some()
    }
}

/// Canvas size plus the caption block reserved at its bottom
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingDimensions {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub text_height: f64,
    pub text_y: f64,
}

/// Place an under-panel (entropy or frequencies) beneath everything placed so far
fn stack_below(panel: &mut Panel, width: &mut f64, height: &mut f64, padding: f64) {
    if panel.width > *width {
        *width = panel.width;
    } else {
        panel.x = (*width - panel.width) / 2.0;
    }
    if *height != 0.0 {
        panel.y = *height + padding;
        *height += padding + panel.height;
    } else {
        *height = panel.height;
    }
}

/// Assign every panel its position and compute the canvas size. The map
/// goes beside (grid) or below (stacked) the tree; entropy and frequencies
/// follow underneath, centred when narrower than the canvas.
pub fn position_panels(
    panels: &mut PanelSet,
    layout: PanelLayout,
    text_lines: usize,
    padding: f64,
) -> BoundingDimensions {
    let mut width = 0.0_f64;
    let mut height = 0.0_f64;

    let tree_dims = panels.tree.as_ref().map(|t| (t.width, t.height));
    let map_dims = if panels.has_map() {
        panels.map_tiles.as_ref().map(|m| (m.width, m.height))
    } else {
        None
    };

    match (tree_dims, map_dims) {
        (Some((tree_w, tree_h)), Some((map_w, map_h))) => {
            let (map_x, map_y) = match layout {
                PanelLayout::Grid => {
                    width = tree_w + padding + map_w;
                    height = tree_h.max(map_h);
                    (tree_w + padding, 0.0)
                }
                PanelLayout::Stacked => {
                    width = tree_w.max(map_w);
                    height = tree_h + padding + map_h;
                    (0.0, tree_h + padding)
                }
            };
            for panel in [&mut panels.map_d3, &mut panels.map_tiles].into_iter().flatten() {
                panel.x = map_x;
                panel.y = map_y;
            }
        }
        (Some((tree_w, tree_h)), None) => {
            width = tree_w;
            height = tree_h;
        }
        (None, Some((map_w, map_h))) => {
            width = map_w;
            height = map_h;
        }
        (None, None) => {}
    }

    if let Some(map_d3) = panels.map_d3.as_mut() {
        if let Some(offsets) = map_d3.pan_offsets {
            map_d3.x += offsets.x;
            map_d3.y += offsets.y;
        }
    }

    if let Some(entropy) = panels.entropy.as_mut() {
        stack_below(entropy, &mut width, &mut height, padding);
    }
    if let Some(frequencies) = panels.frequencies.as_mut() {
        stack_below(frequencies, &mut width, &mut height, padding);
    }

    for panel in panels.iter_mut() {
        panel.x += padding;
        panel.y += padding;
    }
    width += 2.0 * padding;
    height += 2.0 * padding;

    let text_height = text_lines as f64 * TEXT_LINE_HEIGHT + TEXT_BLOCK_BASE;
    height += text_height;

    BoundingDimensions {
        width,
        height,
        padding,
        text_height,
        text_y: height - text_height,
    }
}
