//! Canonical equality key for deployment configs.

use crate::config::FunctionConfig;

/// Reduce a config to a deterministic equality key.
///
/// Fields are concatenated in a fixed order, so the key is independent of
/// how the config was assembled. Missing fields serialize to the empty
/// string. Two configs are compatible iff their keys are byte-equal.
///
/// The trailing flag records only *whether* regeneration is configured:
/// regenerating and non-regenerating routes must never share a group, but
/// the regeneration details themselves (expiration, tokens) are per-route
/// and do not affect unit compatibility.
pub fn config_hash(config: &FunctionConfig) -> String {
    [
        config.runtime.clone(),
        config.external.join(" "),
        config.regions.join(" "),
        config.memory.map(|m| m.to_string()).unwrap_or_default(),
        config
            .max_duration
            .map(|d| d.to_string())
            .unwrap_or_default(),
        config.isr.is_some().to_string(),
    ]
    .join(",")
}

// ============================================================================
// tests
// ============================================================================
