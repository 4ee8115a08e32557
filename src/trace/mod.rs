//! Dependency-trace interface and resolution-failure triage.
//!
//! The tracer itself is an external collaborator: the framework build step
//! records, per server entry, the transitive file closure plus any module
//! resolution failures into `trace.json`. This module reads that manifest
//! and decides which failures matter.
//!
//! # Example (trace.json)
//!
//! ```json
//! {
//!     "/build/server/index.js": {
//!         "files": ["/build/server/index.js", "/build/server/chunks/db.js"],
//!         "failures": [
//!             { "importer": "/build/server/chunks/db.js", "module": "pg-native" }
//!         ]
//!     }
//! }
//! ```

use anyhow::{Context, Result, bail};
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::warn;

/// Module-specifier prefixes whose resolution failures are noise: optional
/// platform shims that only exist on their own platform.
const IGNORED_MODULE_PREFIXES: &[&str] = &["node:", "bun:", "deno:", "cloudflare:"];

/// Resolver-internal marker for synthetic commonjs proxy modules.
const COMMONJS_PROXY_MARKER: &str = "?commonjs-";

/// Importer extensions that are not executable code; parse failures inside
/// them never indicate a broken bundle.
const NON_EXECUTABLE_EXTENSIONS: &[&str] = &["css", "json", "svg", "html", "wasm", "map"];

/// One tracer-reported resolution failure. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolutionFailure {
    /// File that performed the import.
    pub importer: PathBuf,

    /// Module specifier that did not resolve.
    pub module: String,
}

/// The traced closure for one entry artifact.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TracedFileSet {
    /// Absolute paths the entry transitively requires, deduplicated in
    /// first-seen order.
    pub files: Vec<PathBuf>,

    /// Non-fatal resolution-failure records.
    #[serde(default)]
    pub failures: Vec<ResolutionFailure>,
}

impl TracedFileSet {
    /// Deduplicate the file list, preserving first-seen order.
    pub fn dedup(&mut self) {
        let mut seen = FxHashSet::default();
        self.files.retain(|path| seen.insert(path.clone()));
    }
}

/// Computes the transitive file closure of an entry artifact.
pub trait Tracer {
    fn trace(&self, entry: &Path) -> Result<TracedFileSet>;
}

/// Reads per-entry closures from `trace.json` in the build directory.
#[derive(Debug)]
pub struct ManifestTracer {
    path: PathBuf,
    entries: serde_json::Map<String, serde_json::Value>,
}

impl ManifestTracer {
    pub fn load(path: PathBuf) -> Result<Self> {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading trace manifest `{}`", path.display()))?;
        let entries = serde_json::from_str(&raw)
            .with_context(|| format!("parsing trace manifest `{}`", path.display()))?;
        Ok(Self { path, entries })
    }
}

impl Tracer for ManifestTracer {
    fn trace(&self, entry: &Path) -> Result<TracedFileSet> {
        let key = entry.to_string_lossy();
        let Some(value) = self.entries.get(key.as_ref()) else {
            bail!(
                "no trace recorded for entry `{}` in `{}`",
                entry.display(),
                self.path.display()
            );
        };
        let mut traced: TracedFileSet = serde_json::from_value(value.clone())
            .with_context(|| format!("malformed trace for entry `{}`", entry.display()))?;
        traced.dedup();
        Ok(traced)
    }
}

// ============================================================================
// Failure triage
// ============================================================================

/// Whether a failure belongs to a known-ignorable category.
fn is_ignorable(failure: &ResolutionFailure) -> bool {
    if IGNORED_MODULE_PREFIXES
        .iter()
        .any(|prefix| failure.module.starts_with(prefix))
        || failure.module.contains(COMMONJS_PROXY_MARKER)
    {
        return true;
    }
    failure
        .importer
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| NON_EXECUTABLE_EXTENSIONS.contains(&ext))
}

/// Drop ignorable failures; return the reportable rest.
pub fn partition_failures(failures: &[ResolutionFailure]) -> Vec<ResolutionFailure> {
    failures
        .iter()
        .filter(|f| !is_ignorable(f))
        .cloned()
        .collect()
}

/// Print reportable failures grouped by importing file. Never fatal: missing
/// optional dependencies usually mean unused code paths, and the bundle is
/// still produced.
pub fn report_failures(failures: &[ResolutionFailure]) {
    let mut by_importer: Vec<(&Path, Vec<&str>)> = Vec::new();
    for failure in failures {
        match by_importer
            .iter_mut()
            .find(|(importer, _)| *importer == failure.importer.as_path())
        {
            Some((_, modules)) => modules.push(failure.module.as_str()),
            None => by_importer.push((failure.importer.as_path(), vec![failure.module.as_str()])),
        }
    }

    for (importer, modules) in by_importer {
        warn!(
            "trace";
            "{} could not resolve: {}",
            importer.display(),
            modules.join(", ")
        );
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

    fn failure(importer: &str, module: &str) -> ResolutionFailure {
        ResolutionFailure {
            importer: PathBuf::from(importer),
            module: module.to_string(),
        }
    }

    #[test]
    fn test_partition_drops_platform_shims() {
        let failures = vec![
            failure("/build/a.js", "node:sqlite"),
            failure("/build/a.js", "bun:ffi"),
            failure("/build/a.js", "cloudflare:sockets"),
            failure("/build/a.js", "pg-native"),
        ];
        let reportable = partition_failures(&failures);
        assert_eq!(reportable, vec![failure("/build/a.js", "pg-native")]);
    }

    #[test]
    fn test_partition_drops_commonjs_proxies_and_assets() {
        let failures = vec![
            failure("/build/a.js", "\0lib.js?commonjs-proxy"),
            failure("/build/styles.css", "./missing.woff2"),
            failure("/build/b.js", "left-pad"),
        ];
        let reportable = partition_failures(&failures);
        assert_eq!(reportable, vec![failure("/build/b.js", "left-pad")]);
    }

    #[test]
    fn test_traced_file_set_dedup_preserves_order() {
        let mut traced = TracedFileSet {
            files: vec![
                PathBuf::from("/a/one.js"),
                PathBuf::from("/a/two.js"),
                PathBuf::from("/a/one.js"),
            ],
            failures: vec![],
        };
        traced.dedup();
        assert_eq!(
            traced.files,
            vec![PathBuf::from("/a/one.js"), PathBuf::from("/a/two.js")]
        );
    }

    #[test]
    fn test_manifest_tracer() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.json");
        fs::write(
            &path,
            r#"{
                "/build/server/index.js": {
                    "files": ["/build/server/index.js", "/build/server/chunks/db.js"],
                    "failures": [
                        { "importer": "/build/server/chunks/db.js", "module": "pg-native" }
                    ]
                }
            }"#,
        )
        .unwrap();

        let tracer = ManifestTracer::load(path).unwrap();
        let traced = tracer.trace(Path::new("/build/server/index.js")).unwrap();
        assert_eq!(traced.files.len(), 2);
        assert_eq!(traced.failures[0].module, "pg-native");

        // Unknown entries are an error, not an empty closure
        assert!(tracer.trace(Path::new("/build/missing.js")).is_err());
    }
}
