//! Shared test utilities for unitforge tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use unitforge::config::Config;

/// Test environment with temporary directories for options and output.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Base directory (project root simulation)
    pub base_dir: PathBuf,
    /// Directory holding <module>.toml option files
    pub options_dir: PathBuf,
    /// Output root (stands in for / of the target system)
    pub root: PathBuf,
}

impl TestEnv {
    /// Create a new test environment with temporary directories.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_dir = temp_dir.path().to_path_buf();
        let options_dir = base_dir.join("modules");
        let root = base_dir.join("output/rootfs");

        fs::create_dir_all(&options_dir).expect("Failed to create options dir");

        Self {
            _temp_dir: temp_dir,
            base_dir,
            options_dir,
            root,
        }
    }

    /// Config pointing at this environment's directories.
    pub fn config(&self) -> Config {
        Config::from_vars(&self.base_dir, &HashMap::new())
    }

    /// Write `<module>.toml` into the options directory.
    pub fn write_options(&self, module: &str, text: &str) -> PathBuf {
        let path = self.options_dir.join(format!("{}.toml", module));
        fs::write(&path, text).expect("Failed to write option file");
        path
    }

    /// Path of a target-system file inside the output root.
    pub fn installed(&self, system_path: &str) -> PathBuf {
        self.root.join(system_path.trim_start_matches('/'))
    }
}

/// Assert that a symlink exists and points to the expected target.
pub fn assert_symlink(path: &Path, expected_target: &str) {
    assert!(
        path.is_symlink(),
        "Expected symlink at {}, but it's not a symlink",
        path.display()
    );

    let target = fs::read_link(path).expect("Failed to read symlink");
    assert_eq!(
        target.to_string_lossy(),
        expected_target,
        "Symlink {} points to {:?}, expected {}",
        path.display(),
        target,
        expected_target
    );
}

/// Assert that a file contains expected content.
pub fn assert_file_contains(path: &Path, expected: &str) {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e));
    assert!(
        content.contains(expected),
        "File {} does not contain expected content.\nExpected to find: {}\nActual content: {}",
        path.display(),
        expected,
        content
    );
}

/// Assert that a file exists.
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "Expected file to exist: {}", path.display());
}

/// Assert that a file does not exist.
pub fn assert_file_absent(path: &Path) {
    assert!(!path.exists(), "Expected no file at: {}", path.display());
}
