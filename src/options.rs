//! Loading user option files.
//!
//! Option files are TOML. Each module deserializes into its own typed options
//! struct (all fields defaulted, unknown keys denied), so type mismatches are
//! rejected here and never reach a renderer.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read options file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid options in {}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },
}

/// Parse option text. `origin` is only used in error messages.
pub fn parse_options<T: DeserializeOwned>(text: &str, origin: &Path) -> Result<T, OptionsError> {
    toml::from_str(text).map_err(|e| OptionsError::Invalid {
        path: origin.to_path_buf(),
        message: e.message().to_string(),
    })
}

/// Load options from `path`, or defaults when no file is given.
pub fn load_options<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T, OptionsError> {
    let Some(path) = path else {
        return Ok(T::default());
    };

    let text = fs::read_to_string(path).map_err(|source| OptionsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_options(&text, path)
}
