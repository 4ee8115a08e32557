//! Per-function deployment configuration.
//!
//! A route declares an optional override fragment; the user declares defaults
//! in `stratus.toml`; the adapter computes a default runtime from the host
//! version. [`FunctionConfig::resolve`] folds the three layers together with
//! precedence: route override > user defaults > computed default.

use serde::{Deserialize, Serialize};

/// Incremental regeneration settings for one route.
///
/// # Example (routes manifest)
///
/// ```json
/// { "expiration": 60, "bypassToken": "s3cret", "allowQuery": ["page"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct IsrConfig {
    /// Seconds a generated response may be reused; `null` means never expire.
    pub expiration: Option<u64>,

    /// Token that skips the cache when sent with a request.
    pub bypass_token: Option<String>,

    /// Query parameters allowed to vary the cached response.
    pub allow_query: Vec<String>,
}

/// A partial config layer: route override or user defaults.
///
/// Every field is optional so that layers merge without clobbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Execution runtime identifier (e.g. `nodejs20.x`, `edge`).
    pub runtime: Option<String>,

    /// Packages resolved at runtime instead of bundled.
    pub external: Option<Vec<String>>,

    /// Deployment regions.
    pub regions: Option<Vec<String>>,

    /// Memory limit in MB.
    pub memory: Option<u32>,

    /// Maximum invocation duration in seconds.
    pub max_duration: Option<u32>,

    /// Incremental regeneration settings.
    pub isr: Option<IsrConfig>,

    /// Force this route into its own deployable unit.
    pub split: Option<bool>,
}

/// The effective, fully-resolved config for one route.
///
/// Value type: equality between configs is defined by
/// [`config_hash`](crate::group::config_hash), never by identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionConfig {
    pub runtime: String,
    pub external: Vec<String>,
    pub regions: Vec<String>,
    pub memory: Option<u32>,
    pub max_duration: Option<u32>,
    pub isr: Option<IsrConfig>,
    pub split: bool,
}

impl FunctionConfig {
    /// Fold config layers: route override > user defaults > computed default.
    ///
    /// `default_runtime` is the runtime inferred from the host version; it
    /// only applies when neither layer names one.
    pub fn resolve(
        route: Option<&ConfigOverride>,
        defaults: &ConfigOverride,
        default_runtime: &str,
    ) -> Self {
        Self {
            runtime: route
                .and_then(|o| o.runtime.clone())
                .or_else(|| defaults.runtime.clone())
                .unwrap_or_else(|| default_runtime.to_string()),
            external: route
                .and_then(|o| o.external.clone())
                .or_else(|| defaults.external.clone())
                .unwrap_or_default(),
            regions: route
                .and_then(|o| o.regions.clone())
                .or_else(|| defaults.regions.clone())
                .unwrap_or_default(),
            memory: route.and_then(|o| o.memory).or(defaults.memory),
            max_duration: route.and_then(|o| o.max_duration).or(defaults.max_duration),
            isr: route
                .and_then(|o| o.isr.clone())
                .or_else(|| defaults.isr.clone()),
            split: route
                .and_then(|o| o.split)
                .or(defaults.split)
                .unwrap_or(false),
        }
    }
}

// ============================================================================
// tests
// ============================================================================
