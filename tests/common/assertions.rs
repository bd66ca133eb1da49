//! Filesystem assertions over produced download trees

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Every regular file below `root`, relative to it, sorted
pub fn files_under(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();
    files.sort();
    files
}

/// Every directory below `root` (excluding `root`), relative to it, sorted
pub fn directories_under(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }
    let mut dirs: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();
    dirs.sort();
    dirs
}

/// Assert no interrupted writes were left behind
pub fn assert_no_partial_files(root: &Path) {
    let partial: Vec<PathBuf> = files_under(root)
        .into_iter()
        .filter(|p| p.extension().is_some_and(|ext| ext == "part"))
        .collect();
    assert!(partial.is_empty(), "partial files left behind: {partial:?}");
}
