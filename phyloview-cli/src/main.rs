use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use config::Config;
use error::{format_error_with_suggestions, CliError};
use phyloview_core::{DistanceMeasure, LayoutMode};
use phyloview_render::PanelLayout;

#[derive(Parser)]
#[command(name = "phyloview")]
#[command(about = "PhyloView - grid layout and figure/table export for phylogenetic trees")]
#[command(version)]
#[command(long_about = "
PhyloView computes the gridlines drawn behind a phylogenetic tree, composes the
visible panels of a tree view into a single SVG figure, and exports tree data as
TSV tables and Newick.

Examples:
  phyloview grid --scales scales.json --layout radial --format svg
  phyloview svg --snapshot panels.json --out-dir figures --layout stacked
  phyloview authors --tree tree.json --meta meta.json
  phyloview newick --tree tree.json --temporal
  phyloview options --available datasets.json --selected flu/h3n2
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute gridlines for a pair of axis scales
    Grid {
        /// JSON file with `x` and `y` scales ({"domain": [..], "range": [..]})
        #[arg(long, required = true)]
        scales: PathBuf,

        /// Tree layout (rect, radial, clock, unrooted)
        #[arg(long)]
        layout: Option<LayoutMode>,

        /// Depth of the root node (radial layouts)
        #[arg(long)]
        root_depth: Option<f64>,

        /// Distance measure (div or num_date)
        #[arg(long)]
        distance: Option<DistanceMeasure>,

        /// Output format
        #[arg(long, default_value = "svg")]
        format: GridFormat,

        /// Emit every gridline hidden
        #[arg(long)]
        hidden: bool,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Compose serialized panels into one SVG figure
    Svg {
        /// JSON snapshot with panel markup, optional map tiles and caption
        #[arg(long, required = true)]
        snapshot: PathBuf,

        /// Output directory
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// File name prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Tree/map arrangement (grid, stacked)
        #[arg(long)]
        layout: Option<PanelLayout>,

        /// Caption line (repeatable, replaces the snapshot caption)
        #[arg(long)]
        caption: Vec<String>,
    },

    /// Export the author table as TSV
    Authors {
        /// Tree JSON file
        #[arg(long, required = true)]
        tree: PathBuf,

        /// Metadata JSON file
        #[arg(long, required = true)]
        meta: PathBuf,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        #[arg(long)]
        prefix: Option<String>,
    },

    /// Export per-strain metadata as TSV
    Metadata {
        /// Tree JSON file
        #[arg(long, required = true)]
        tree: PathBuf,

        /// Attribute columns (comma separated; all attributes when omitted)
        #[arg(long, value_delimiter = ',')]
        attrs: Vec<String>,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        #[arg(long)]
        prefix: Option<String>,
    },

    /// Export the tree as Newick
    Newick {
        /// Tree JSON file
        #[arg(long, required = true)]
        tree: PathBuf,

        /// Use sampling dates instead of divergence for branch lengths
        #[arg(long)]
        temporal: bool,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        #[arg(long)]
        prefix: Option<String>,
    },

    /// List the dataset choices available at each selector level
    Options {
        /// JSON array of dataset paths (each an array of fields)
        #[arg(long)]
        available: Option<PathBuf>,

        /// Current selection, e.g. flu/h3n2/ha
        #[arg(long, default_value = "")]
        selected: String,

        /// Data source name shown while datasets are unknown
        #[arg(long)]
        source: Option<String>,
    },

    /// Configuration helpers
    Config {
        /// Print an example configuration file
        #[arg(long)]
        example: bool,

        /// Write the example configuration to this path instead
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum GridFormat {
    Svg,
    Json,
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Grid {
            scales,
            layout,
            root_depth,
            distance,
            format,
            hidden,
            out,
        } => {
            commands::grid::execute(&config, scales, layout, root_depth, distance, format, hidden, out)?;
        }

        Commands::Svg {
            snapshot,
            out_dir,
            prefix,
            layout,
            caption,
        } => {
            commands::svg::execute(&config, snapshot, out_dir, prefix, layout, caption)?;
        }

        Commands::Authors {
            tree,
            meta,
            out_dir,
            prefix,
        } => {
            commands::tables::authors(&config, tree, meta, out_dir, prefix)?;
        }

        Commands::Metadata {
            tree,
            attrs,
            out_dir,
            prefix,
        } => {
            commands::tables::metadata(&config, tree, attrs, out_dir, prefix)?;
        }

        Commands::Newick {
            tree,
            temporal,
            out_dir,
            prefix,
        } => {
            commands::tables::newick(&config, tree, temporal, out_dir, prefix)?;
        }

        Commands::Options {
            available,
            selected,
            source,
        } => {
            commands::options::execute(available, &selected, source)?;
        }

        Commands::Config { example, write } => match write {
            Some(path) => {
                Config::default().save_to_file(&path)?;
                log::info!("Example configuration written to {}", path.display());
            }
            None if example => println!("{}", Config::example_toml()?),
            None => println!(
                "{}",
                toml::to_string_pretty(&config).context("Failed to serialize configuration")?
            ),
        },
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            eprintln!("Error: {}", format_error_with_suggestions(cli_err));
            std::process::exit(1);
        }
        return Err(err);
    }

    Ok(())
}
