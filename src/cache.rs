//! Content hashing for generated artifacts.
//!
//! Uses SHA256 to detect actual content changes, so regenerating an
//! unchanged module leaves file mtimes alone.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::warn;

/// SHA256 of a byte slice as lowercase hex.
pub fn hash_bytes(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// SHA256 of a file on disk.
/// Returns None if the file doesn't exist.
/// Logs a warning if a file exists but can't be read.
pub fn hash_file(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }
    match fs::read(path) {
        Ok(content) => Some(hash_bytes(&content)),
        Err(e) => {
            warn!(
                "Failed to read {} for hashing: {} (will rewrite)",
                path.display(),
                e
            );
            None
        }
    }
}

/// Check if `target` must be (re)written to hold `contents`.
///
/// Returns true if:
/// - Target doesn't exist or can't be read
/// - Target content hash differs from the new content
pub fn needs_write(target: &Path, contents: &[u8]) -> bool {
    match hash_file(target) {
        Some(existing) => existing != hash_bytes(contents),
        None => true,
    }
}
