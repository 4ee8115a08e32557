//! Copy a traced closure into a destination directory.

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use std::fs;
use std::path::Path;

use super::ancestor::common_ancestor;
use super::entry::{FileEntry, classify, relative_to, symlink};
use crate::debug;
use crate::trace::{ResolutionFailure, TracedFileSet, partition_failures, report_failures};

/// Outcome of one materialization.
#[derive(Debug)]
pub struct BundleReport {
    /// Number of closure paths materialized (companion files excluded).
    pub file_count: usize,

    /// Resolution failures that were worth reporting.
    pub reported: Vec<ResolutionFailure>,
}

/// Materialize the closure of `entry` into `dest`.
///
/// The bundle is rooted at the shallowest common ancestor of the traced
/// paths, so relative structure below it is preserved and nothing above it
/// leaks in. Symlinks are recreated as relative links inside the bundle
/// (never absolute host paths), keeping the output relocatable.
///
/// Per-file work runs in parallel: destinations are disjoint and directory
/// creation is idempotent, so ordering between files is not observable. Any
/// I/O error aborts the whole materialization; a partial bundle is not a
/// supported output.
pub fn materialize(entry: &Path, traced: &TracedFileSet, dest: &Path) -> Result<BundleReport> {
    let reported = partition_failures(&traced.failures);
    report_failures(&reported);

    if traced.files.is_empty() {
        bail!("tracer returned an empty closure for entry `{}`", entry.display());
    }
    let ancestor = common_ancestor(traced.files.iter().map(|p| p.as_path()))
        .context("computing bundle root")?;
    debug!("bundle"; "root {} ({} files)", ancestor.display(), traced.files.len());

    fs::create_dir_all(dest)
        .with_context(|| format!("creating bundle directory `{}`", dest.display()))?;

    traced.files.par_iter().try_for_each(|source| -> Result<()> {
        let rel = source.strip_prefix(&ancestor).with_context(|| {
            format!(
                "traced file `{}` is outside the bundle root `{}`",
                source.display(),
                ancestor.display()
            )
        })?;
        let target = dest.join(rel);

        match classify(source)
            .with_context(|| format!("inspecting `{}`", source.display()))?
        {
            FileEntry::Directory => {
                fs::create_dir_all(&target)
                    .with_context(|| format!("creating `{}`", target.display()))?;
            }
            FileEntry::Regular => {
                create_parent(&target)?;
                fs::copy(source, &target).with_context(|| {
                    format!("copying `{}` to `{}`", source.display(), target.display())
                })?;
            }
            FileEntry::Symlink { real } => {
                create_parent(&target)?;
                link_into_bundle(source, &real, &ancestor, dest, &target)?;
            }
        }
        Ok(())
    })?;

    let entry_rel = entry
        .strip_prefix(&ancestor)
        .with_context(|| format!("entry `{}` is outside the bundle root", entry.display()))?;
    write_companions(dest, entry_rel)?;

    Ok(BundleReport {
        file_count: traced.files.len(),
        reported,
    })
}

/// Create the parent directory of a destination path. Idempotent.
fn create_parent(target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating `{}`", parent.display()))?;
    }
    Ok(())
}

/// Recreate a symlink inside the bundle.
///
/// The link points at the relative path (from the destination's parent) to
/// where the real target lands inside the bundle. Link targets are never
/// copied through, so a real target outside the bundle root has nothing to
/// point at and fails the materialization.
fn link_into_bundle(
    source: &Path,
    real: &Path,
    ancestor: &Path,
    dest: &Path,
    target: &Path,
) -> Result<()> {
    let Ok(real_rel) = real.strip_prefix(ancestor) else {
        bail!(
            "symlink `{}` resolves to `{}`, outside the bundle root `{}`; \
             its target was not part of the traced closure",
            source.display(),
            real.display(),
            ancestor.display()
        );
    };

    let real_dest = dest.join(real_rel);
    let parent = target.parent().unwrap_or(dest);
    let link_value = relative_to(parent, &real_dest);
    symlink(&link_value, target).with_context(|| {
        format!(
            "linking `{}` -> `{}`",
            target.display(),
            link_value.display()
        )
    })?;
    Ok(())
}

/// Emit the fixed companion files at the bundle root: the execution entry
/// point and a minimal module descriptor.
fn write_companions(dest: &Path, entry_rel: &Path) -> Result<()> {
    let entry_import = entry_rel.to_string_lossy().replace('\\', "/");
    let launcher = format!(
        "const server = await import('./{entry_import}');\n\
         \n\
         export default server.default ?? server;\n"
    );
    fs::write(dest.join("index.mjs"), launcher)
        .with_context(|| format!("writing `{}`", dest.join("index.mjs").display()))?;

    fs::write(dest.join("package.json"), "{\n\t\"type\": \"module\"\n}\n")
        .with_context(|| format!("writing `{}`", dest.join("package.json").display()))?;
    Ok(())
}

// ============================================================================
// tests
// ============================================================================
