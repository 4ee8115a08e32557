//! File classification: regular file, directory, or symbolic link.
//!
//! The distinction drives materialization, so it is derived once per path
//! as a tagged variant instead of re-checked at every call site.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// How one traced path must be materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEntry {
    /// Copy bytes verbatim.
    Regular,
    /// mkdir side effect only, no content.
    Directory,
    /// Recreate as a link; `real` is the symlink-resolved location.
    Symlink { real: PathBuf },
}

/// Classify a path by comparing it to its symlink-resolved real path.
///
/// A path whose real location differs from its nominal one is a link (or
/// sits behind one) and must be recreated as a link, never copied through.
pub fn classify(path: &Path) -> io::Result<FileEntry> {
    let real = fs::canonicalize(path)?;
    if real != path {
        return Ok(FileEntry::Symlink { real });
    }
    let meta = fs::metadata(path)?;
    if meta.is_dir() {
        Ok(FileEntry::Directory)
    } else {
        Ok(FileEntry::Regular)
    }
}

/// Relative path from directory `from` to `to` (`../` hops as needed).
pub fn relative_to(from: &Path, to: &Path) -> PathBuf {
    let from_parts: Vec<_> = from.components().collect();
    let to_parts: Vec<_> = to.components().collect();
    let shared = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in shared..from_parts.len() {
        rel.push("..");
    }
    for part in &to_parts[shared..] {
        rel.push(part.as_os_str());
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    rel
}

/// Create a symbolic link at `link` pointing at `original`.
#[cfg(unix)]
pub fn symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

/// Create a symbolic link at `link` pointing at `original`.
#[cfg(windows)]
pub fn symlink(original: &Path, link: &Path) -> io::Result<()> {
    // `original` is relative to the link's parent, resolve before checking
    let resolved = match link.parent() {
        Some(parent) => parent.join(original),
        None => original.to_path_buf(),
    };
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(original, link)
    } else {
        std::os::windows::fs::symlink_file(original, link)
    }
}

// ============================================================================
// tests
// ============================================================================
