//! CLI command for `iowarp-build clean`
//!
//! Removes cloned sources, build trees and stage logs. The install prefix
//! is left alone.

use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::output::{is_json, print_detail, print_info, print_success};
use crate::core::clean::clean_work_root;
use crate::core::settings::Settings;
use crate::infra::dirs;

/// Execute the clean command
pub fn execute(
    current_dir: &Path,
    settings: &Settings,
    work_dir: Option<&Path>,
    keep_sources: bool,
) -> Result<()> {
    let work_root = work_dir
        .map(Path::to_path_buf)
        .or_else(|| settings.build.work_dir.clone())
        .unwrap_or_else(|| dirs::default_work_root(current_dir));
    let work_root = dirs::absolutize(&work_root, current_dir);

    let result = clean_work_root(&work_root, keep_sources)
        .with_context(|| format!("Failed to clean {}", work_root.display()))?;

    if is_json() {
        let json_result = serde_json::json!({
            "work_root": work_root,
            "removed": result.removed,
            "bytes_freed": result.bytes_freed,
        });
        println!("{}", serde_json::to_string_pretty(&json_result)?);
        return Ok(());
    }

    if result.removed.is_empty() {
        print_info(&format!("Nothing to clean in {}", work_root.display()));
        return Ok(());
    }

    for path in &result.removed {
        print_detail(&format!("removed {}", path.display()));
    }
    print_success(&format!("Freed {}", format_size(result.bytes_freed)));

    Ok(())
}

/// Format a byte count for display
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}
