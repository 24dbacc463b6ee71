//! Configuration management for unitforge.
//!
//! Reads configuration from .env file and environment variables.
//! Environment variables take precedence over .env file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default output root, relative to the base directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output/rootfs";

/// Default directory searched for `<module>.toml` option files.
pub const DEFAULT_OPTIONS_DIR: &str = "modules";

/// Unitforge configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Output root standing in for `/` (default: output/rootfs)
    pub output_dir: PathBuf,
    /// Directory holding per-module option files (default: modules)
    pub options_dir: PathBuf,
}

impl Config {
    /// Load configuration from `<base_dir>/.env` and the environment.
    pub fn load(base_dir: &Path) -> Self {
        let mut env_vars = HashMap::new();

        // .env first, so the real environment overrides it
        if let Ok(iter) = dotenvy::from_path_iter(base_dir.join(".env")) {
            for (key, value) in iter.flatten() {
                env_vars.insert(key, value);
            }
        }
        for (key, value) in std::env::vars() {
            env_vars.insert(key, value);
        }

        Self::from_vars(base_dir, &env_vars)
    }

    /// Build config from an explicit variable map.
    pub fn from_vars(base_dir: &Path, env_vars: &HashMap<String, String>) -> Self {
        let resolve = |key: &str, default: &str| {
            let path = env_vars
                .get(key)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default));
            if path.is_absolute() {
                path
            } else {
                base_dir.join(path)
            }
        };

        Self {
            output_dir: resolve("UNITFORGE_OUTPUT", DEFAULT_OUTPUT_DIR),
            options_dir: resolve("UNITFORGE_OPTIONS_DIR", DEFAULT_OPTIONS_DIR),
        }
    }

    /// Option file for a module, if one exists in the options directory.
    pub fn options_file(&self, module: &str) -> Option<PathBuf> {
        let path = self.options_dir.join(format!("{}.toml", module));
        path.is_file().then_some(path)
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  UNITFORGE_OUTPUT: {}", self.output_dir.display());
        println!("  UNITFORGE_OPTIONS_DIR: {}", self.options_dir.display());
        if self.options_dir.is_dir() {
            println!("  Options directory: FOUND");
        } else {
            println!("  Options directory: NOT FOUND (all modules use defaults)");
        }
    }
}
