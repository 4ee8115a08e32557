//! Incremental-regeneration descriptors and their validation.

use super::GroupError;
use crate::config::{FunctionConfig, IsrConfig, is_persistent_runtime};
use crate::route::Route;

/// Query parameter the adapter injects to disambiguate cached pages.
/// Users must not declare it themselves.
pub const RESERVED_QUERY_PARAM: &str = "__pathname";

/// Resolved regeneration settings for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsrDescriptor {
    /// Seconds a generated response may be reused; `None` means never expire.
    pub expiration: Option<u64>,

    /// Token that skips the cache when sent with a request.
    pub bypass_token: Option<String>,

    /// Effective allow-list: the reserved parameter plus the user's list.
    pub allow_query: Vec<String>,

    /// Cached responses vary on allowed query parameters.
    pub pass_query: bool,

    /// 1-based sequential number, unique per regenerating route.
    pub group: u32,
}

/// Validate regeneration preconditions and build the descriptor.
///
/// Fatal when the effective runtime is not a persistent-process runtime, or
/// when the user allow-list claims the reserved parameter.
pub fn build_descriptor(
    route: &Route,
    config: &FunctionConfig,
    isr: &IsrConfig,
    group: u32,
) -> Result<IsrDescriptor, GroupError> {
    if !is_persistent_runtime(&config.runtime) {
        return Err(GroupError::IsrOnEphemeralRuntime {
            route: route.id.clone(),
            runtime: config.runtime.clone(),
        });
    }

    if isr.allow_query.iter().any(|q| q == RESERVED_QUERY_PARAM) {
        return Err(GroupError::ReservedQueryParam {
            route: route.id.clone(),
            param: RESERVED_QUERY_PARAM,
        });
    }

    let mut allow_query = Vec::with_capacity(isr.allow_query.len() + 1);
    allow_query.push(RESERVED_QUERY_PARAM.to_string());
    allow_query.extend(isr.allow_query.iter().cloned());

    Ok(IsrDescriptor {
        expiration: isr.expiration,
        bypass_token: isr.bypass_token.clone(),
        allow_query,
        pass_query: true,
        group,
    })
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigOverride, FunctionConfig, IsrConfig};
    use crate::route::{PrerenderMode, Route};

    fn route(id: &str) -> Route {
        Route {
            id: id.to_string(),
            pattern: format!("^/{id}/?$"),
            segments: vec![],
            prerender: PrerenderMode::Auto,
            entry: None,
            config: None,
        }
    }

    fn config_with_isr(runtime: &str, allow_query: &[&str]) -> FunctionConfig {
        let mut config = FunctionConfig::resolve(None, &ConfigOverride::default(), runtime);
        config.isr = Some(IsrConfig {
            expiration: Some(60),
            bypass_token: Some("tok".to_string()),
            allow_query: allow_query.iter().map(|q| (*q).to_string()).collect(),
        });
        config
    }

    #[test]
    fn test_descriptor_prepends_reserved_param() {
        let config = config_with_isr("nodejs20.x", &["page"]);
        let isr = config.isr.clone().unwrap();
        let descriptor = build_descriptor(&route("blog"), &config, &isr, 1).unwrap();

        assert_eq!(descriptor.allow_query, vec!["__pathname", "page"]);
        assert_eq!(descriptor.group, 1);
        assert!(descriptor.pass_query);
        assert_eq!(descriptor.expiration, Some(60));
        assert_eq!(descriptor.bypass_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_rejects_ephemeral_runtime() {
        let config = config_with_isr("edge", &[]);
        let isr = config.isr.clone().unwrap();
        let err = build_descriptor(&route("blog"), &config, &isr, 1).unwrap_err();
        assert!(matches!(
            err,
            GroupError::IsrOnEphemeralRuntime { ref route, ref runtime }
                if route == "blog" && runtime == "edge"
        ));
    }

    #[test]
    fn test_rejects_reserved_param() {
        let config = config_with_isr("nodejs20.x", &["page", "__pathname"]);
        let isr = config.isr.clone().unwrap();
        let err = build_descriptor(&route("blog"), &config, &isr, 1).unwrap_err();
        assert!(matches!(err, GroupError::ReservedQueryParam { .. }));
    }
}
