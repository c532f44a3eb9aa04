//! PhyloView Core Library
//!
//! Tree data model, axis scales, string/colour helpers and the tabular/Newick
//! exporters shared by the grid and composition engines.

pub mod types;
pub mod scale;
pub mod strings;
pub mod export;
pub mod color;
pub mod dataset;

// Re-export commonly used types and functions
pub use types::{AuthorInfo, DistanceMeasure, LayoutMode, Metadata, TreeNode};
pub use scale::AxisScale;
pub use strings::{js_number, to_fixed, pretty_string, PrettyOptions};
pub use export::{author_table, strain_table, to_newick, NewickError};
pub use color::{Rgb, ColorError};
pub use dataset::dataset_options;

/// Version information for the PhyloView core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
