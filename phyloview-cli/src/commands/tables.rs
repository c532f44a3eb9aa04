//! Table and tree export commands: author TSV, strain metadata TSV and Newick

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::{read_json, report};
use crate::config::Config;
use crate::error::CliError;
use phyloview_core::export::collect_attribute_names;
use phyloview_core::{Metadata, TreeNode};
use phyloview_render::export;
use phyloview_render::DirectorySink;

fn load_tree(path: &Path) -> Result<TreeNode> {
    let tree: TreeNode = read_json(path)?;
    if tree.strain.is_empty() && !tree.has_children() {
        return Err(CliError::invalid_input(format!("{} holds an empty tree", path.display())).into());
    }
    log::info!("Loaded tree with {} tips", tree.tips().count());
    Ok(tree)
}

pub fn authors(config: &Config, tree: PathBuf, meta: PathBuf, out_dir: PathBuf, prefix: Option<String>) -> Result<()> {
    let root = load_tree(&tree)?;
    let metadata: Metadata = read_json(&meta)?;
    let prefix = prefix.unwrap_or_else(|| config.export.prefix.clone());

    let mut sink = DirectorySink::new(&out_dir)?;
    let notification = export::author_tsv(&mut sink, &prefix, &metadata, &root.nodes())?;
    report(&notification);
    Ok(())
}

pub fn metadata(config: &Config, tree: PathBuf, attrs: Vec<String>, out_dir: PathBuf, prefix: Option<String>) -> Result<()> {
    let root = load_tree(&tree)?;
    let nodes = root.nodes();
    let attrs = if attrs.is_empty() {
        collect_attribute_names(&nodes)
    } else {
        attrs
    };
    let prefix = prefix.unwrap_or_else(|| config.export.prefix.clone());

    let mut sink = DirectorySink::new(&out_dir)?;
    let notification = export::strain_tsv(&mut sink, &prefix, &nodes, &attrs)?;
    report(&notification);
    Ok(())
}

pub fn newick(config: &Config, tree: PathBuf, temporal: bool, out_dir: PathBuf, prefix: Option<String>) -> Result<()> {
    let root = load_tree(&tree)?;
    let prefix = prefix.unwrap_or_else(|| config.export.prefix.clone());

    let mut sink = DirectorySink::new(&out_dir)?;
    let notification = export::newick(&mut sink, &prefix, &root, temporal)
        .map_err(|e| CliError::export(format!("{:#}", e)))?;
    report(&notification);
    Ok(())
}
