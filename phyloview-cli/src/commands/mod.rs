//! Command implementations for the PhyloView CLI

pub mod grid;
pub mod options;
pub mod svg;
pub mod tables;

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::{CliError, CliResult};
use phyloview_render::Notification;

/// Read and deserialize a JSON input file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    if !path.exists() {
        return Err(CliError::file_not_found(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| CliError::parse(path.display().to_string(), e.to_string()))
}

/// Report an export outcome the way the viewer would show it
pub fn report(notification: &Notification) {
    if notification.is_warning() {
        log::warn!("{}", notification);
    } else {
        log::info!("{}", notification);
    }
}
