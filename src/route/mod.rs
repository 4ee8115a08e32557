//! Route model and the routes-manifest source.
//!
//! The framework build step writes `routes.json`, an ordered array of route
//! records plus a default server entry. [`RouteSource`] is the seam: the
//! manifest reader is the production implementation, tests substitute
//! in-memory fixtures.
//!
//! # Example (routes.json)
//!
//! ```json
//! {
//!     "defaultEntry": "/project/build/server/index.js",
//!     "routes": [
//!         {
//!             "id": "src/routes/blog/[slug]",
//!             "pattern": "^/blog/([^/]+?)/?$",
//!             "segments": [
//!                 { "content": "blog", "dynamic": false },
//!                 { "content": "[slug]", "dynamic": true }
//!             ],
//!             "prerender": "auto",
//!             "config": { "runtime": "nodejs20.x" }
//!         }
//!     ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ConfigOverride;

/// Prerender mode declared on a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrerenderMode {
    /// Rendered to static output at build time.
    Always,
    /// Always rendered on demand.
    Never,
    /// The framework decides per page; still dynamic at adapt time.
    #[default]
    Auto,
}

/// One path segment of a route, with its dynamic flag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Segment {
    pub content: String,
    pub dynamic: bool,
}

/// A declared URL-matching unit with its deployment configuration.
///
/// Immutable once parsed from the manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Source directory of the route, relative to the project root.
    pub id: String,

    /// Compiled dispatch pattern; opaque, compared as a string.
    pub pattern: String,

    /// Path segments with dynamic flags.
    #[serde(default)]
    pub segments: Vec<Segment>,

    /// Prerender mode.
    #[serde(default)]
    pub prerender: PrerenderMode,

    /// Server entry for this route; falls back to the manifest default.
    #[serde(default)]
    pub entry: Option<PathBuf>,

    /// Raw per-route config override.
    #[serde(default)]
    pub config: Option<ConfigOverride>,
}

impl Route {
    /// Whether the route is fully static output (excluded from grouping).
    pub fn is_prerendered(&self) -> bool {
        self.prerender == PrerenderMode::Always
    }

    /// Human-readable path reconstructed from segments, for logs.
    pub fn path(&self) -> String {
        let parts: Vec<&str> = self.segments.iter().map(|s| s.content.as_str()).collect();
        format!("/{}", parts.join("/"))
    }
}

/// The parsed routes manifest: declaration-ordered routes plus the default
/// server entry used by units that have no route of their own.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteManifest {
    pub default_entry: PathBuf,
    pub routes: Vec<Route>,
}

impl RouteManifest {
    /// Entry artifact for a route, falling back to the manifest default.
    pub fn entry_for<'a>(&'a self, route: &'a Route) -> &'a Path {
        route.entry.as_deref().unwrap_or(&self.default_entry)
    }
}

/// Source of route definitions.
pub trait RouteSource {
    fn load(&self) -> Result<RouteManifest>;
}

/// Reads `routes.json` from the framework build directory.
#[derive(Debug)]
pub struct ManifestRouteSource {
    path: PathBuf,
}

impl ManifestRouteSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl RouteSource for ManifestRouteSource {
    fn load(&self) -> Result<RouteManifest> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("reading routes manifest `{}`", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing routes manifest `{}`", self.path.display()))
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_manifest_parsing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("routes.json");
        fs::write(
            &path,
            r#"{
                "defaultEntry": "/build/server/index.js",
                "routes": [
                    {
                        "id": "src/routes/about",
                        "pattern": "^/about/?$",
                        "segments": [{ "content": "about", "dynamic": false }],
                        "prerender": "always",
                        "entry": "/build/server/about.js"
                    },
                    {
                        "id": "src/routes/blog/[slug]",
                        "pattern": "^/blog/([^/]+?)/?$",
                        "segments": [
                            { "content": "blog", "dynamic": false },
                            { "content": "[slug]", "dynamic": true }
                        ],
                        "config": { "memory": 1024, "split": true }
                    }
                ]
            }"#,
        )
        .unwrap();

        let manifest = ManifestRouteSource::new(path).load().unwrap();
        assert_eq!(manifest.default_entry, PathBuf::from("/build/server/index.js"));
        assert_eq!(manifest.routes.len(), 2);

        let about = &manifest.routes[0];
        assert!(about.is_prerendered());
        assert!(!about.segments[0].dynamic);
        // A declared per-route entry wins over the manifest default
        assert_eq!(manifest.entry_for(about), Path::new("/build/server/about.js"));

        let blog = &manifest.routes[1];
        assert_eq!(blog.prerender, PrerenderMode::Auto);
        assert!(!blog.is_prerendered());
        assert!(blog.segments[1].dynamic);
        assert_eq!(blog.path(), "/blog/[slug]");
        let config = blog.config.as_ref().unwrap();
        assert_eq!(config.memory, Some(1024));
        assert_eq!(config.split, Some(true));
        // Per-route entry falls back to the manifest default
        assert_eq!(manifest.entry_for(blog), Path::new("/build/server/index.js"));
    }
}
