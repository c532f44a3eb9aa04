//! Options command implementation - list dataset choices per selector level

use anyhow::Result;
use std::path::PathBuf;

use super::read_json;
use phyloview_core::dataset::bare_data_path;
use phyloview_core::dataset_options;

pub fn execute(available: Option<PathBuf>, selected: &str, source: Option<String>) -> Result<()> {
    let fields: Vec<String> = selected
        .split('/')
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();

    let Some(path) = available else {
        let fields = (!fields.is_empty()).then_some(fields.as_slice());
        println!("{}", bare_data_path(source.as_deref(), fields));
        return Ok(());
    };

    let datasets: Vec<Vec<String>> = read_json(&path)?;
    log::debug!("{} datasets available", datasets.len());

    for (level, choices) in dataset_options(&datasets, &fields).iter().enumerate() {
        let current = fields.get(level).map(String::as_str).unwrap_or("-");
        println!("{}\t{}\t{}", level, current, choices.join(", "));
    }

    Ok(())
}
