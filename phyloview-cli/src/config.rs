//! Configuration handling for the PhyloView CLI
//!
//! Supports loading configuration from phyloview.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use phyloview_render::{GridStyle, PanelLayout};

pub const DEFAULT_CONFIG_FILE: &str = "phyloview.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default distance measure ("div" or "num_date")
    #[serde(default = "default_distance")]
    pub distance_measure: String,

    /// Default tree layout
    #[serde(default = "default_layout")]
    pub layout: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Minor gridlines per major interval for divergence trees
    #[serde(default = "default_minor_ticks")]
    pub minor_ticks: u32,

    /// Minor gridlines per major interval for time trees
    #[serde(default = "default_minor_ticks_time_tree")]
    pub minor_ticks_time_tree: u32,

    #[serde(default)]
    pub style: GridStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// File name prefix for exported files
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Tree/map arrangement in SVG exports ("grid" or "stacked")
    #[serde(default)]
    pub panel_layout: PanelLayout,

    /// Gap between panels and around the canvas
    #[serde(default = "default_padding")]
    pub padding: f64,

    /// Caption lines placed below the panels
    #[serde(default)]
    pub caption: Vec<String>,
}

// Default value functions
fn default_distance() -> String { "div".to_string() }
fn default_layout() -> String { "rect".to_string() }
fn default_minor_ticks() -> u32 { 4 }
fn default_minor_ticks_time_tree() -> u32 { 3 }
fn default_prefix() -> String { "nextstrain".to_string() }
fn default_padding() -> f64 { phyloview_render::panels::DEFAULT_PADDING }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            distance_measure: default_distance(),
            layout: default_layout(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            minor_ticks: default_minor_ticks(),
            minor_ticks_time_tree: default_minor_ticks_time_tree(),
            style: GridStyle::default(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            panel_layout: PanelLayout::default(),
            padding: default_padding(),
            caption: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default configuration")
    }
}
