/*!
# PhyloView Rendering Pipeline

Pure geometry and text transforms behind the tree view's exported output:

1. **Grid layout**: major/minor gridlines, their SVG paths and tick labels for
   rectangular, radial and clock layouts ([`grid`], drawn by [`svg::grid_to_svg`])
2. **Panel composition**: parses serialized panels, positions them on one canvas
   and emits a single SVG document with a caption block ([`panels`], [`compose`])
3. **Export**: writes TSV, Newick and SVG files through a [`export::FileSink`]
   and reports a [`Notification`]
*/

pub mod grid;
pub mod svg;
pub mod panels;
pub mod compose;
pub mod export;

pub use grid::{compute_grid, major_grid_separation, GridError, GridLayout, GridParams, GridPoint, Visibility, Axis};
pub use svg::{grid_to_svg, GridStyle};
pub use panels::{parse_panel, position_panels, BoundingDimensions, Panel, PanelId, PanelLayout, PanelSet, PanOffsets};
pub use compose::{compose_export, ComposeError, ComposedSvg, MapTiles, PanelSources, SourcePanel};
pub use export::{DirectorySink, ExportError, FileSink, MapTileProvider, MemorySink, MimeType, SvgOptions};

// Re-export important types
pub use phyloview_core::{AxisScale, LayoutMode, DistanceMeasure, TreeNode, Metadata};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
}

/// Outcome report of an export, shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub details: Option<String>,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
            details: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn is_warning(&self) -> bool {
        self.level == NotificationLevel::Warning
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{} ({})", self.message, details),
            None => write!(f, "{}", self.message),
        }
    }
}
