/*!
# Panel Composition

Turns the serialized markup of each visible panel into one standalone SVG
document: panels are parsed, positioned by [`position_panels`], nested as
`<svg id=…>` children of a root element, and followed by a caption block.

A panel that fails to parse is logged, reported in [`ComposedSvg::errors`]
and left out; the remaining panels are still composed.
*/

use crate::panels::{parse_panel, position_panels, BoundingDimensions, Panel, PanOffsets, PanelLayout, PanelSet};
use crate::svg::{escape_xml, SvgBuilder, XHTML_NS};
use phyloview_core::js_number;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const ENTROPY_FONT_STYLE: &str =
    r#"<style>.txt { font-family: "Lato", "Helvetica Neue", "Helvetica", "sans-serif"; }</style>"#;
const CAPTION_STYLE: &str = "font-family:lato,sans-serif;";

/// Source panel names as reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourcePanel {
    Tree,
    Map,
    Entropy,
    Frequencies,
}

impl fmt::Display for SourcePanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourcePanel::Tree => "tree",
            SourcePanel::Map => "map",
            SourcePanel::Entropy => "entropy",
            SourcePanel::Frequencies => "frequencies",
        };
        f.write_str(name)
    }
}

/// Serialized markup of the panels currently shown. `map` is the vector
/// overlay (demes and transmissions); its raster tiles come from [`MapTiles`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSources {
    pub tree: Option<String>,
    pub map: Option<String>,
    pub entropy: Option<String>,
    pub frequencies: Option<String>,
}

impl PanelSources {
    pub fn requested(&self) -> Vec<SourcePanel> {
        [
            (SourcePanel::Tree, self.tree.is_some()),
            (SourcePanel::Map, self.map.is_some()),
            (SourcePanel::Entropy, self.entropy.is_some()),
            (SourcePanel::Frequencies, self.frequencies.is_some()),
        ]
        .into_iter()
        .filter_map(|(panel, present)| present.then_some(panel))
        .collect()
    }

    pub fn wants_map(&self) -> bool {
        self.map.is_some()
    }
}

/// Rendered map tiles as a base64 data URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapTiles {
    pub base64_map: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub pan_offsets: PanOffsets,
}

impl MapTiles {
    fn to_panel(&self) -> Panel {
        let inner = format!(
            r#"<image width="{}" height="{}" xlink:href="{}"/>"#,
            js_number(self.width),
            js_number(self.height),
            self.base64_map
        );
        Panel::new(self.width, self.height, inner)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComposeError {
    #[error("no panel could be exported (failed: {})", join_names(.failed))]
    NoPanels { failed: Vec<SourcePanel> },
}

pub(crate) fn join_names(panels: &[SourcePanel]) -> String {
    panels
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A finished export document
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedSvg {
    pub document: String,
    pub dimensions: BoundingDimensions,
    /// Panels that were requested but could not be included
    pub errors: Vec<SourcePanel>,
}

impl ComposedSvg {
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn style_entropy(mut panel: Panel) -> Panel {
    panel.inner = format!(
        "{}{}",
        ENTROPY_FONT_STYLE,
        panel.inner.replace("<text", r#"<text class="txt""#)
    );
    panel
}

/// Parse every present source into the panel set, recording failures
pub fn collect_panels(sources: &PanelSources, tiles: Option<&MapTiles>) -> (PanelSet, Vec<SourcePanel>) {
    let mut set = PanelSet::default();
    let mut errors = Vec::new();

    let mut parse = |name: SourcePanel, markup: &str| match parse_panel(markup) {
        Ok(panel) => Some(panel),
        Err(e) => {
            log::error!("{} SVG save error: {}", name, e);
            errors.push(name);
            None
        }
    };

    if let Some(markup) = &sources.tree {
        set.tree = parse(SourcePanel::Tree, markup);
    }
    if let Some(markup) = &sources.entropy {
        set.entropy = parse(SourcePanel::Entropy, markup).map(style_entropy);
    }
    if let Some(markup) = &sources.frequencies {
        set.frequencies = parse(SourcePanel::Frequencies, markup);
    }
    match (&sources.map, tiles) {
        (Some(markup), Some(tiles)) => {
            if let Some(mut overlay) = parse(SourcePanel::Map, markup) {
                overlay.width = tiles.width;
                overlay.height = tiles.height;
                overlay.pan_offsets = Some(tiles.pan_offsets);
                set.map_tiles = Some(tiles.to_panel());
                set.map_d3 = Some(overlay);
            }
        }
        (Some(_), None) => log::warn!("Map panel requested without map tiles; skipping map"),
        _ => {}
    }

    (set, errors)
}

/// Emit the root document for already positioned panels
pub fn render_document(panels: &PanelSet, dims: &BoundingDimensions, text_lines: &[String]) -> String {
    let mut svg = SvgBuilder::new();
    svg.open_root(dims.width, dims.height);

    for (id, panel) in panels.iter() {
        svg.push(format!(
            r#"<svg id="{}" width="{}" height="{}" x="{}" y="{}">"#,
            id,
            js_number(panel.width),
            js_number(panel.height),
            js_number(panel.x),
            js_number(panel.y)
        ));
        svg.push(panel.inner.as_str());
        svg.close_svg();
    }

    svg.push(format!(
        r#"<foreignObject x="{}" y="{}" height="{}" width="{}">"#,
        js_number(dims.padding),
        js_number(dims.height - dims.text_height),
        js_number(dims.text_height),
        js_number(dims.width - 2.0 * dims.padding)
    ));
    for line in text_lines {
        svg.push(format!(r#"<p xmlns="{}" style="{}">"#, XHTML_NS, CAPTION_STYLE));
        svg.push(escape_xml(line));
        svg.push("</p>");
    }
    svg.push("</foreignObject>");
    svg.close_svg();

    svg.finish()
}

/// Compose all panels into one SVG document with a caption below them.
pub fn compose_export(
    sources: &PanelSources,
    tiles: Option<&MapTiles>,
    layout: PanelLayout,
    text_lines: &[String],
    padding: f64,
) -> Result<ComposedSvg, ComposeError> {
    let (mut panels, errors) = collect_panels(sources, tiles);
    if panels.is_empty() {
        return Err(ComposeError::NoPanels { failed: errors });
    }

    let dimensions = position_panels(&mut panels, layout, text_lines.len(), padding);
    log::debug!(
        "Composed {} panel(s) on a {}x{} canvas ({} layout)",
        panels.iter().count(),
        dimensions.width,
        dimensions.height,
        layout
    );

    Ok(ComposedSvg {
        document: render_document(&panels, &dimensions, text_lines),
        dimensions,
        errors,
    })
}
