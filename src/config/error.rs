//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    /// The host runtime version cannot be mapped to a default runtime and
    /// the user did not configure one explicitly.
    #[error(
        "unsupported host runtime: Node {0} (supported majors: 18, 20, 22); \
         set `defaults.runtime` in stratus.toml to override"
    )]
    UnsupportedRuntime(u32),
}
