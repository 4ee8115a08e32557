//! Runtime identifiers and default-runtime inference.
//!
//! The host runtime version is an explicit input resolved once at startup
//! (CLI flag or config), never read from the environment ad hoc.

use super::ConfigError;

/// Node majors we can map to a default runtime identifier.
const SUPPORTED_MAJORS: &[u32] = &[18, 20, 22];

/// Host runtime version, as injected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeVersion {
    pub major: u32,
}

impl NodeVersion {
    pub const fn new(major: u32) -> Self {
        Self { major }
    }
}

/// Pick the default execution runtime for the given host version.
///
/// # Examples
/// ```ignore
/// infer_default_runtime(NodeVersion::new(20)) -> Ok("nodejs20.x")
/// infer_default_runtime(NodeVersion::new(16)) -> Err(UnsupportedRuntime(16))
/// ```
pub fn infer_default_runtime(host: NodeVersion) -> Result<String, ConfigError> {
    if SUPPORTED_MAJORS.contains(&host.major) {
        Ok(format!("nodejs{}.x", host.major))
    } else {
        Err(ConfigError::UnsupportedRuntime(host.major))
    }
}

/// Whether a runtime identifier denotes a persistent-process runtime.
///
/// Incremental regeneration needs one; edge runtimes are ephemeral.
pub fn is_persistent_runtime(runtime: &str) -> bool {
    runtime.starts_with("nodejs")
}

// ============================================================================
// tests
// ============================================================================
