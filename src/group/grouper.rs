//! The grouping fold: routes in, ordered groups out.

use rustc_hash::FxHashMap;

use super::hash::config_hash;
use super::isr::{IsrDescriptor, build_descriptor};
use super::GroupError;
use crate::config::{ConfigOverride, FunctionConfig};
use crate::route::Route;

/// An insertion-ordered bucket of routes sharing one deployment config.
///
/// Created lazily the first time its identity is seen; never merged or
/// split afterwards. The index is stable and assignment-order dependent.
#[derive(Debug, Clone)]
pub struct Group {
    /// Sequential index, 0-based, in creation order.
    pub index: usize,

    /// Canonical config for the group (the first member's effective config).
    pub config: FunctionConfig,

    /// Member routes in encounter order.
    pub routes: Vec<Route>,
}

/// Result of one grouping pass.
#[derive(Debug, Default)]
pub struct GroupedRoutes {
    /// Groups in creation order.
    pub groups: Vec<Group>,

    /// Regeneration descriptors, keyed by route id.
    pub isr: FxHashMap<String, IsrDescriptor>,

    /// Prerendered routes that requested regeneration; warned, never fatal.
    pub ignored_isr: Vec<String>,

    /// Prerendered routes excluded from grouping (served from static output).
    pub prerendered: Vec<String>,
}

/// Partition routes into the minimum number of deployable groups.
///
/// Strictly sequential: conflict detection, regeneration numbering and group
/// indices all depend on the declared route order. Validation happens here,
/// before any file I/O, so an authoring mistake never produces a partially
/// written output tree.
pub fn group_routes(
    routes: &[Route],
    defaults: &ConfigOverride,
    default_runtime: &str,
) -> Result<GroupedRoutes, GroupError> {
    let mut result = GroupedRoutes::default();

    // pattern -> (hash, first route id) for conflict detection
    let mut seen_patterns: FxHashMap<String, (String, String)> = FxHashMap::default();
    // group identity -> index into result.groups
    let mut identities: FxHashMap<String, usize> = FxHashMap::default();

    let mut split_count = 0usize;
    let mut isr_count = 0u32;

    for route in routes {
        let config = FunctionConfig::resolve(route.config.as_ref(), defaults, default_runtime);

        if route.is_prerendered() {
            if config.isr.is_some() {
                result.ignored_isr.push(route.id.clone());
            }
            result.prerendered.push(route.id.clone());
            continue;
        }

        if let Some(isr) = &config.isr {
            isr_count += 1;
            let descriptor = build_descriptor(route, &config, isr, isr_count)?;
            result.isr.insert(route.id.clone(), descriptor);
        }

        let hash = config_hash(&config);
        match seen_patterns.get(&route.pattern) {
            Some((prior_hash, prior_id)) if *prior_hash != hash => {
                return Err(GroupError::ConflictingConfig {
                    first: prior_id.clone(),
                    second: route.id.clone(),
                    pattern: route.pattern.clone(),
                });
            }
            Some(_) => {}
            None => {
                seen_patterns.insert(route.pattern.clone(), (hash.clone(), route.id.clone()));
            }
        }

        // Split routes get a unique identity so equal hashes still separate.
        let identity = if config.split {
            split_count += 1;
            format!("{hash}|split-{split_count}")
        } else {
            hash
        };

        let index = *identities.entry(identity).or_insert_with(|| {
            result.groups.push(Group {
                index: result.groups.len(),
                config: config.clone(),
                routes: Vec::new(),
            });
            result.groups.len() - 1
        });
        result.groups[index].routes.push(route.clone());
    }

    Ok(result)
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IsrConfig;
    use crate::route::PrerenderMode;

    fn route(id: &str, pattern: &str, config: Option<ConfigOverride>) -> Route {
        Route {
            id: id.to_string(),
            pattern: pattern.to_string(),
            segments: vec![],
            prerender: PrerenderMode::Auto,
            entry: None,
            config,
        }
    }

    fn memory(mb: u32) -> ConfigOverride {
        ConfigOverride {
            memory: Some(mb),
            ..Default::default()
        }
    }

    #[test]
    fn test_equal_configs_share_a_group() {
        let routes = vec![
            route("a", "^/a/?$", None),
            route("b", "^/b/?$", None),
            route("c", "^/c/?$", Some(memory(3008))),
        ];
        let grouped = group_routes(&routes, &ConfigOverride::default(), "nodejs20.x").unwrap();

        assert_eq!(grouped.groups.len(), 2);
        assert_eq!(grouped.groups[0].index, 0);
        assert_eq!(grouped.groups[0].routes.len(), 2);
        assert_eq!(grouped.groups[1].routes[0].id, "c");
        // The canonical config is the first member's effective config
        assert_eq!(grouped.groups[0].config.memory, None);
        assert_eq!(grouped.groups[1].config.memory, Some(3008));
    }

    #[test]
    fn test_grouping_is_deterministic() {
        let routes = vec![
            route("a", "^/a/?$", Some(memory(512))),
            route("b", "^/b/?$", None),
            route("c", "^/c/?$", Some(memory(512))),
        ];
        let defaults = ConfigOverride::default();
        let first = group_routes(&routes, &defaults, "nodejs20.x").unwrap();
        let second = group_routes(&routes, &defaults, "nodejs20.x").unwrap();

        assert_eq!(first.groups.len(), second.groups.len());
        for (x, y) in first.groups.iter().zip(&second.groups) {
            assert_eq!(x.index, y.index);
            let ids = |g: &Group| g.routes.iter().map(|r| r.id.clone()).collect::<Vec<_>>();
            assert_eq!(ids(x), ids(y));
        }
    }

    #[test]
    fn test_conflict_is_order_independent() {
        let a = route("a", "^/x/?$", Some(memory(512)));
        let b = route("b", "^/x/?$", Some(memory(1024)));
        let defaults = ConfigOverride::default();

        let forward = group_routes(&[a.clone(), b.clone()], &defaults, "nodejs20.x");
        let backward = group_routes(&[b, a], &defaults, "nodejs20.x");
        assert!(matches!(forward, Err(GroupError::ConflictingConfig { .. })));
        assert!(matches!(backward, Err(GroupError::ConflictingConfig { .. })));

        // Equal hashes on the same pattern are fine and share a group.
        let a = route("a", "^/x/?$", Some(memory(512)));
        let b = route("b", "^/x/?$", Some(memory(512)));
        let grouped = group_routes(&[a, b], &defaults, "nodejs20.x").unwrap();
        assert_eq!(grouped.groups.len(), 1);
        assert_eq!(grouped.groups[0].routes.len(), 2);
    }

    #[test]
    fn test_conflict_names_both_routes() {
        let a = route("src/routes/x", "^/x/?$", Some(memory(512)));
        let b = route("src/routes/x.json", "^/x/?$", Some(memory(1024)));
        let err = group_routes(&[a, b], &ConfigOverride::default(), "nodejs20.x").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("src/routes/x"));
        assert!(message.contains("src/routes/x.json"));
        assert!(message.contains("^/x/?$"));
    }

    #[test]
    fn test_split_routes_get_singleton_groups() {
        let split = ConfigOverride {
            split: Some(true),
            ..Default::default()
        };
        let routes = vec![
            route("a", "^/a/?$", Some(split.clone())),
            route("b", "^/b/?$", Some(split)),
        ];
        let grouped = group_routes(&routes, &ConfigOverride::default(), "nodejs20.x").unwrap();

        // Identical hashes, but split forces one group per route.
        assert_eq!(grouped.groups.len(), 2);
        assert_eq!(grouped.groups[0].routes.len(), 1);
        assert_eq!(grouped.groups[1].routes.len(), 1);
    }

    #[test]
    fn test_prerendered_routes_are_skipped() {
        let mut prerendered = route("about", "^/about/?$", None);
        prerendered.prerender = PrerenderMode::Always;
        let routes = vec![prerendered, route("app", "^/app/?$", None)];
        let grouped = group_routes(&routes, &ConfigOverride::default(), "nodejs20.x").unwrap();

        assert_eq!(grouped.groups.len(), 1);
        assert_eq!(grouped.groups[0].routes[0].id, "app");
        assert_eq!(grouped.prerendered, vec!["about".to_string()]);
        assert!(grouped.ignored_isr.is_empty());
    }

    #[test]
    fn test_isr_on_prerendered_route_is_ignored_with_warning() {
        let mut r = route(
            "feed",
            "^/feed/?$",
            Some(ConfigOverride {
                isr: Some(IsrConfig::default()),
                ..Default::default()
            }),
        );
        r.prerender = PrerenderMode::Always;
        let grouped = group_routes(&[r], &ConfigOverride::default(), "nodejs20.x").unwrap();

        assert_eq!(grouped.ignored_isr, vec!["feed".to_string()]);
        assert!(grouped.isr.is_empty());
        assert!(grouped.groups.is_empty());
    }

    #[test]
    fn test_isr_descriptors_numbered_sequentially() {
        let isr_route = |id: &str, pattern: &str| {
            route(
                id,
                pattern,
                Some(ConfigOverride {
                    isr: Some(IsrConfig {
                        allow_query: vec!["page".to_string()],
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
            )
        };
        let routes = vec![
            isr_route("first", "^/first/?$"),
            route("plain", "^/plain/?$", None),
            isr_route("second", "^/second/?$"),
        ];
        let grouped = group_routes(&routes, &ConfigOverride::default(), "nodejs20.x").unwrap();

        let first = &grouped.isr["first"];
        assert_eq!(first.group, 1);
        assert_eq!(first.allow_query, vec!["__pathname", "page"]);
        assert!(first.pass_query);
        assert_eq!(grouped.isr["second"].group, 2);
    }

    #[test]
    fn test_isr_on_edge_runtime_fails() {
        let r = route(
            "blog",
            "^/blog/?$",
            Some(ConfigOverride {
                runtime: Some("edge".to_string()),
                isr: Some(IsrConfig::default()),
                ..Default::default()
            }),
        );
        let err = group_routes(&[r], &ConfigOverride::default(), "nodejs20.x").unwrap_err();
        assert!(matches!(err, GroupError::IsrOnEphemeralRuntime { .. }));
    }
}
