//! Default file locations.

use std::path::PathBuf;

/// `config.toml` in the working directory.
#[must_use]
pub fn default_config() -> PathBuf {
    PathBuf::from("config.toml")
}
