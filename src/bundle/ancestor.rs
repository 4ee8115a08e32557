//! Shallowest-common-ancestor computation over traced file paths.

use std::path::{Component, Path, PathBuf};

/// Compute the deepest directory containing every path in the set.
///
/// The candidate starts as the first file's parent directory; every
/// subsequent path truncates it at the first diverging segment. The result
/// becomes the bundle's logical root, so relative structure below it is
/// preserved and nothing above it leaks into the output.
///
/// Returns `None` for an empty set.
///
/// # Examples
/// ```ignore
/// common_ancestor([/a/b/c.js, /a/b/d.js]) -> /a/b
/// common_ancestor([/a/b/c.js, /a/x/d.js]) -> /a
/// common_ancestor([/a/b/c.js])            -> /a/b
/// ```
pub fn common_ancestor<'a, I>(paths: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut iter = paths.into_iter();
    let first = iter.next()?;
    let mut ancestor: Vec<Component<'a>> = first.parent()?.components().collect();

    for path in iter {
        let shared = ancestor
            .iter()
            .zip(path.components())
            .take_while(|&(a, b)| *a == b)
            .count();
        ancestor.truncate(shared);
    }

    Some(ancestor.iter().collect())
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ancestor_of(paths: &[&str]) -> PathBuf {
        common_ancestor(paths.iter().map(Path::new)).unwrap()
    }

    #[test]
    fn test_siblings_share_their_directory() {
        assert_eq!(
            ancestor_of(&["/a/b/c.js", "/a/b/d.js"]),
            PathBuf::from("/a/b")
        );
    }

    #[test]
    fn test_divergent_paths_truncate() {
        assert_eq!(
            ancestor_of(&["/a/b/c.js", "/a/x/d.js"]),
            PathBuf::from("/a")
        );
    }

    #[test]
    fn test_single_file_yields_own_directory() {
        assert_eq!(ancestor_of(&["/a/b/c.js"]), PathBuf::from("/a/b"));
    }

    #[test]
    fn test_deep_mixed_set() {
        assert_eq!(
            ancestor_of(&[
                "/srv/app/build/server/index.js",
                "/srv/app/build/server/chunks/db.js",
                "/srv/app/node_modules/pkg/index.js",
            ]),
            PathBuf::from("/srv/app")
        );
    }

    #[test]
    fn test_empty_set() {
        assert_eq!(common_ancestor(std::iter::empty::<&Path>()), None);
    }
}
