//! Clean logic
//!
//! Removes the work root, or only the build trees and logs when sources
//! should be kept for the next run. The install prefix is never touched.

use std::path::{Path, PathBuf};

use crate::config::defaults::{BUILD_DIR_SUFFIX, LOGS_DIR};
use crate::error::FilesystemError;

/// Result of clean operation
#[derive(Debug, Default)]
pub struct CleanResult {
    /// Paths that were removed
    pub removed: Vec<PathBuf>,
    /// Bytes of regular files removed
    pub bytes_freed: u64,
}

/// Clean a work root
///
/// With `keep_sources`, only `*-build` directories and the logs directory
/// are removed, so the next run reuses the existing checkouts.
pub fn clean_work_root(work_root: &Path, keep_sources: bool) -> Result<CleanResult, FilesystemError> {
    let mut result = CleanResult::default();

    if !work_root.exists() {
        return Ok(result);
    }

    let targets = if keep_sources {
        disposable_entries(work_root)?
    } else {
        vec![work_root.to_path_buf()]
    };

    for path in targets {
        result.bytes_freed += tree_size(&path);
        std::fs::remove_dir_all(&path).map_err(|e| FilesystemError::RemoveDir {
            path: path.clone(),
            error: e.to_string(),
        })?;
        result.removed.push(path);
    }

    Ok(result)
}

/// Build directories and logs directly under the work root
fn disposable_entries(work_root: &Path) -> Result<Vec<PathBuf>, FilesystemError> {
    let entries = std::fs::read_dir(work_root).map_err(|e| FilesystemError::ReadDir {
        path: work_root.to_path_buf(),
        error: e.to_string(),
    })?;

    let mut targets: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name == LOGS_DIR || name.ends_with(BUILD_DIR_SUFFIX))
        })
        .collect();
    targets.sort();
    Ok(targets)
}

/// Total size of regular files below `path`
fn tree_size(path: &Path) -> u64 {
    walkdir::WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|meta| meta.len())
        .sum()
}
