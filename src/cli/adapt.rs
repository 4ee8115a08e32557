//! The `adapt` command: wire the manifest collaborators to the planner.

use anyhow::{Context, Result, ensure};
use std::path::Path;

use super::AdaptArgs;
use crate::config::{AdapterConfig, NodeVersion, find_config_file};
use crate::planner::adapt;
use crate::{debug, log};
use crate::route::ManifestRouteSource;
use crate::trace::ManifestTracer;

pub fn run(args: &AdaptArgs, config_path: &Path) -> Result<()> {
    ensure!(
        args.build_dir.is_dir(),
        "build directory `{}` not found; run the framework build first",
        args.build_dir.display()
    );

    // Walk up from the cwd so the adapter works from nested package dirs
    let config_path = find_config_file(config_path).unwrap_or_else(|| config_path.to_path_buf());
    let config = AdapterConfig::load(&config_path)
        .with_context(|| format!("loading `{}`", config_path.display()))?;

    let route_source = ManifestRouteSource::new(args.build_dir.join("routes.json"));
    let tracer = ManifestTracer::load(args.build_dir.join("trace.json"))?;

    let static_dir = args.build_dir.join("static");
    let static_dir = static_dir.is_dir().then_some(static_dir);

    let summary = adapt(
        &route_source,
        &tracer,
        &config,
        NodeVersion::new(args.node),
        static_dir.as_deref(),
        &args.output,
    )?;

    debug!("adapt"; "{} regenerating route(s)", summary.isr.len());
    log!(
        "adapt";
        "done: {} unit(s), {} route(s) -> {}",
        summary.units.len(),
        summary.route_table.len(),
        args.output.display()
    );
    Ok(())
}
