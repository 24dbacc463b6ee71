//! Clean command - removes generated output.

use anyhow::{Context, Result};
use std::fs;
use walkdir::WalkDir;

use crate::config::Config;

/// Execute the clean command. Returns how many files were removed.
pub fn cmd_clean(config: &Config) -> Result<usize> {
    let root = &config.output_dir;
    if !root.exists() {
        println!("Nothing to clean ({} does not exist)", root.display());
        return Ok(0);
    }

    let removed = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| !e.file_type().is_dir())
        .count();

    println!("Removing {}...", root.display());
    fs::remove_dir_all(root).with_context(|| format!("Failed to remove {}", root.display()))?;
    println!("  Removed {} file(s)", removed);
    Ok(removed)
}
