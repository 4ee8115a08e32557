//! Deployment planning: group routes, materialize one bundle per deployable
//! unit, copy static assets, and emit the routing document.

use anyhow::{Context, Result};
use jwalk::WalkDir;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;

use crate::bundle::materialize;
use crate::config::{AdapterConfig, NodeVersion, infer_default_runtime};
use crate::group::{IsrDescriptor, group_routes};
use crate::route::RouteSource;
use crate::trace::Tracer;
use crate::{debug, log, warn};

/// Unit name used when a single group exists, and for the fallback
/// catch-all. The routing document funnels all traffic to it.
pub const DEFAULT_UNIT: &str = "render";

/// One materialized deployable unit.
#[derive(Debug)]
pub struct DeploymentUnit {
    pub name: String,
    pub file_count: usize,
}

/// Everything the adapt pass produced, for logging and inspection.
#[derive(Debug)]
pub struct AdaptSummary {
    /// Materialized units in creation order (fallback last, if any).
    pub units: Vec<DeploymentUnit>,

    /// Route pattern -> unit name, in route declaration order.
    pub route_table: Vec<(String, String)>,

    /// Regeneration descriptors keyed by route id.
    pub isr: FxHashMap<String, IsrDescriptor>,
}

/// Run the full adapt pass.
///
/// Grouping (and with it all authoring validation) happens before any file
/// I/O, so a config mistake never leaves a partially written output tree.
///
/// Collaborators are injected: the route source and tracer come from the
/// framework build, the host runtime version is resolved once at startup.
pub fn adapt(
    route_source: &dyn RouteSource,
    tracer: &dyn Tracer,
    config: &AdapterConfig,
    host: NodeVersion,
    static_dir: Option<&Path>,
    output: &Path,
) -> Result<AdaptSummary> {
    // An explicit runtime in the defaults skips host-version inference.
    let default_runtime = match &config.defaults.runtime {
        Some(runtime) => runtime.clone(),
        None => infer_default_runtime(host)?,
    };

    let manifest = route_source.load()?;
    let grouped = group_routes(&manifest.routes, &config.defaults, &default_runtime)?;

    for id in &grouped.ignored_isr {
        warn!(
            "adapt";
            "route `{id}` is statically prerendered; its regeneration settings are ignored"
        );
    }
    debug!(
        "adapt";
        "{} routes -> {} groups ({} prerendered)",
        manifest.routes.len(),
        grouped.groups.len(),
        grouped.prerendered.len()
    );

    if output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("clearing output directory `{}`", output.display()))?;
    }
    let functions_dir = output.join("functions");
    fs::create_dir_all(&functions_dir)
        .with_context(|| format!("creating `{}`", functions_dir.display()))?;

    let mut units = Vec::new();
    let mut route_table = Vec::new();
    let single = grouped.groups.len() == 1;

    for group in &grouped.groups {
        let name = if single {
            DEFAULT_UNIT.to_string()
        } else {
            format!("fn-{}", group.index)
        };
        let entry = group
            .routes
            .first()
            .map_or(manifest.default_entry.as_path(), |r| manifest.entry_for(r));
        debug!("adapt"; "{name}.func runtime {}", group.config.runtime);

        let file_count = materialize_unit(tracer, entry, &functions_dir, &name)?;
        for route in &group.routes {
            debug!("adapt"; "{name}.func serves {}", route.path());
            route_table.push((route.pattern.clone(), name.clone()));
        }
        units.push(DeploymentUnit { name, file_count });
    }

    // Without exactly one group there is no unit named `render` yet; add the
    // catch-all so the routing document always resolves.
    if !single {
        let file_count = materialize_unit(
            tracer,
            &manifest.default_entry,
            &functions_dir,
            DEFAULT_UNIT,
        )?;
        units.push(DeploymentUnit {
            name: DEFAULT_UNIT.to_string(),
            file_count,
        });
    }

    if let Some(static_dir) = static_dir {
        // Users write base paths as URL prefixes (`/docs`); a leading
        // separator would make `join` discard the output prefix entirely.
        let base_path = config.base_path.trim_start_matches(['/', '\\']);
        let static_root = output.join("static").join(base_path);
        copy_static(static_dir, &static_root)?;
    }

    write_routing_document(output)?;

    Ok(AdaptSummary {
        units,
        route_table,
        isr: grouped.isr,
    })
}

/// Materialize one unit into `<functions>/<name>.func`.
fn materialize_unit(
    tracer: &dyn Tracer,
    entry: &Path,
    functions_dir: &Path,
    name: &str,
) -> Result<usize> {
    let dest = functions_dir.join(format!("{name}.func"));
    if dest.exists() {
        fs::remove_dir_all(&dest)
            .with_context(|| format!("clearing `{}`", dest.display()))?;
    }
    let traced = tracer.trace(entry)?;
    let report = materialize(entry, &traced, &dest)?;
    log!("bundle"; "{name}.func: {} files", report.file_count);
    Ok(report.file_count)
}

/// Copy the client + prerendered asset tree verbatim.
fn copy_static(src: &Path, dest: &Path) -> Result<()> {
    let mut count = 0usize;
    for entry in WalkDir::new(src).sort(true) {
        let entry = entry?;
        let path = entry.path();
        let rel = path
            .strip_prefix(src)
            .with_context(|| format!("walking `{}`", src.display()))?;
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("creating `{}`", target.display()))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating `{}`", parent.display()))?;
            }
            fs::copy(&path, &target).with_context(|| {
                format!("copying `{}` to `{}`", path.display(), target.display())
            })?;
            count += 1;
        }
    }
    log!("adapt"; "static: {count} files");
    Ok(())
}

/// Write the top-level routing document.
///
/// All traffic funnels to the default unit; the recorded route table keeps
/// per-pattern dispatch possible later without changing the format.
fn write_routing_document(output: &Path) -> Result<()> {
    let document = serde_json::json!({
        "routes": [
            { "src": ".*", "dest": format!("/{DEFAULT_UNIT}") }
        ],
        "containerized": false,
    });
    let path = output.join("config.json");
    fs::write(&path, serde_json::to_string_pretty(&document)?)
        .with_context(|| format!("writing `{}`", path.display()))?;
    Ok(())
}

// ============================================================================
// tests
// ============================================================================
