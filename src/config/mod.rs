//! Adapter configuration loaded from `stratus.toml`.
//!
//! # Example
//!
//! ```toml
//! base_path = "docs"          # URL prefix served from the static root
//!
//! [defaults]                  # per-function defaults, overridable per route
//! runtime = "nodejs20.x"
//! regions = ["iad1"]
//! memory = 1024
//! ```

mod error;
mod function;
mod runtime;

pub use error::ConfigError;
pub use function::{ConfigOverride, FunctionConfig, IsrConfig};
pub use runtime::{NodeVersion, infer_default_runtime, is_persistent_runtime};

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level adapter configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// URL prefix under which static assets are served.
    pub base_path: String,

    /// User-declared per-function defaults.
    pub defaults: ConfigOverride,
}

impl AdapterConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file is not an error: every field has a default, so a
    /// project without `stratus.toml` adapts with computed defaults only.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Ok(toml::from_str(&raw)?)
    }
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    // An absolute path is used as-is, no searching
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }
    let cwd = std::env::current_dir().ok()?;
    find_config_upward(&cwd, config_name)
}

/// Walk up from `start` looking for `config_name` in each directory.
fn find_config_upward(start: &Path, config_name: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================
