//! Translation of listed items into download tasks
//!
//! Destinations follow `{root}/{subdirectory?}/{category title}/{position}-{name}.{ext}`,
//! with every component sanitised. Two items sharing a position and name in
//! one category resolve to the same file; the later one overwrites the earlier.

use std::path::{Path, PathBuf};

use crate::types::{Category, DownloadTask, Item};
use crate::utils::sanitize_path_component;

/// Directory a category's assets are saved into
pub fn category_directory(root: &Path, subdirectory: Option<&str>, title: &str) -> PathBuf {
    let mut dir = root.to_path_buf();
    if let Some(sub) = subdirectory {
        dir.push(sanitize_path_component(sub));
    }
    dir.push(sanitize_path_component(title));
    dir
}

/// File name of one asset inside its category directory
pub fn asset_file_name(item: &Item) -> String {
    let name = format!(
        "{}-{}.{}",
        item.sequence_position, item.display_name, item.extension
    );
    sanitize_path_component(&name)
}

/// Tasks for one category, in listing order
pub fn category_tasks(directory: &Path, category: &Category, items: &[Item]) -> Vec<DownloadTask> {
    items
        .iter()
        .map(|item| DownloadTask {
            category: category.title.clone(),
            item: item.clone(),
            destination: directory.join(asset_file_name(item)),
        })
        .collect()
}
