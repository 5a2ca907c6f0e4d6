//! Include/exclude path matching for workspace discovery.
//!
//! Both rule sets are lists of directory paths compared lexically against the
//! paths produced by the walker; nothing here touches the filesystem. Exclusion
//! names whole subtrees (the walker prunes on a match), inclusion is evaluated
//! per path so that children of a skipped directory can still match.

use std::path::{Component, Path, PathBuf};

use tracing::warn;

/// Lexically normalize `path`: drop `.` components, fold `dir/..` pairs and
/// trailing separators. An empty result becomes `.`.
pub fn clean(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(comp),
            },
            _ => parts.push(comp),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Lexical path of `target` relative to `base`.
///
/// Returns `None` when one path is absolute and the other is not, or when
/// `base` climbs above its own starting point so no relative path exists.
pub fn relative(base: &Path, target: &Path) -> Option<PathBuf> {
    let base = clean(base);
    let target = clean(target);
    if base.is_absolute() != target.is_absolute() {
        return None;
    }

    let base_parts: Vec<Component<'_>> = base
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let target_parts: Vec<Component<'_>> = target
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let common = base_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for comp in &base_parts[common..] {
        if matches!(comp, Component::ParentDir) {
            return None;
        }
        rel.push("..");
    }
    for comp in &target_parts[common..] {
        rel.push(comp.as_os_str());
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    Some(rel)
}

/// True when the first component of `rel` is the parent marker.
fn starts_with_up(rel: &Path) -> bool {
    matches!(rel.components().next(), Some(Component::ParentDir))
}

/// True when `rel` is exactly the parent marker.
fn is_up(rel: &Path) -> bool {
    let mut comps = rel.components();
    matches!(comps.next(), Some(Component::ParentDir)) && comps.next().is_none()
}

/// Is `path` selected by the include rules?
///
/// An empty rule list includes everything. Otherwise the path must equal an
/// entry or sit below one.
pub fn included(path: &Path, include_paths: &[PathBuf]) -> bool {
    if include_paths.is_empty() {
        return true;
    }

    for include in include_paths {
        let Some(rel) = relative(include, path) else {
            warn!(path = %path.display(), include = %include.display(), "unable to relate path to include entry");
            continue;
        };
        if path == include.as_path() || !starts_with_up(&rel) {
            return true;
        }
    }
    false
}

/// Is `path` removed by the exclude rules?
///
/// A path is excluded when it equals an entry or sits below one. The direct
/// parent of an entry is never excluded.
pub fn excluded(path: &Path, exclude_paths: &[PathBuf]) -> bool {
    for exclude in exclude_paths {
        let Some(rel) = relative(exclude, path) else {
            warn!(path = %path.display(), exclude = %exclude.display(), "unable to relate path to exclude entry");
            continue;
        };
        if !is_up(&rel) && (path == exclude.as_path() || !starts_with_up(&rel)) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn clean_folds_dots_and_trailing_separators() {
        assert_eq!(clean(Path::new("/ws/./a/../b/")), PathBuf::from("/ws/b"));
        assert_eq!(clean(Path::new("a/..")), PathBuf::from("."));
        assert_eq!(clean(Path::new("../x")), PathBuf::from("../x"));
        assert_eq!(clean(Path::new("/..")), PathBuf::from("/"));
    }

    #[test]
    fn relative_walks_up_and_down() {
        let rel = relative(Path::new("/ws/b"), Path::new("/ws/a.flow"));
        assert_eq!(rel, Some(PathBuf::from("../a.flow")));
        let rel = relative(Path::new("/ws/b"), Path::new("/ws/b/c.flow"));
        assert_eq!(rel, Some(PathBuf::from("c.flow")));
        let rel = relative(Path::new("/ws/b"), Path::new("/ws/b"));
        assert_eq!(rel, Some(PathBuf::from(".")));
        assert_eq!(relative(Path::new("/ws"), Path::new("ws")), None);
    }

    #[test]
    fn include_accepts_entry_and_descendants_only() {
        let rules = paths(&["/ws/sub"]);
        assert!(included(Path::new("/ws/sub"), &rules));
        assert!(included(Path::new("/ws/sub/deep/x.flow"), &rules));
        assert!(!included(Path::new("/ws"), &rules));
        assert!(!included(Path::new("/ws/other/x.flow"), &rules));
    }

    #[test]
    fn include_does_not_match_name_prefix_siblings() {
        let rules = paths(&["/ws/sub"]);
        assert!(!included(Path::new("/ws/subway/x.flow"), &rules));
    }

    #[test]
    fn exclude_matches_entry_and_subtree() {
        let rules = paths(&["/ws/b"]);
        assert!(excluded(Path::new("/ws/b"), &rules));
        assert!(excluded(Path::new("/ws/b/c.flow"), &rules));
        assert!(excluded(Path::new("/ws/b/x/y/z.flow"), &rules));
    }

    #[test]
    fn exclude_spares_parent_and_siblings() {
        let rules = paths(&["/ws/b"]);
        assert!(!excluded(Path::new("/ws"), &rules));
        assert!(!excluded(Path::new("/ws/a.flow"), &rules));
        assert!(!excluded(Path::new("/ws/bb"), &rules));
    }

    #[test]
    fn empty_exclude_list_excludes_nothing() {
        assert!(!excluded(Path::new("/ws/a.flow"), &[]));
    }

    #[test]
    fn mixed_absolute_and_relative_rules_are_skipped() {
        let rules = paths(&["relative/dir"]);
        assert!(!included(Path::new("/ws/a.flow"), &rules));
        assert!(!excluded(Path::new("/ws/a.flow"), &rules));
    }

    /// Strategy for absolute paths made of short lowercase segments.
    fn abs_path() -> impl Strategy<Value = PathBuf> {
        prop::collection::vec("[a-z]{1,6}", 1..6).prop_map(|segs| {
            let mut p = PathBuf::from("/");
            for s in segs {
                p.push(s);
            }
            p
        })
    }

    proptest! {
        #[test]
        fn empty_include_list_includes_everything(p in abs_path()) {
            prop_assert!(included(&p, &[]));
        }

        #[test]
        fn exclude_entry_and_nested_paths_are_excluded(
            e in abs_path(),
            tail in prop::collection::vec("[a-z]{1,6}", 0..4),
        ) {
            let mut p = e.clone();
            for s in tail {
                p.push(s);
            }
            prop_assert!(excluded(&p, std::slice::from_ref(&e)));
        }

        #[test]
        fn parent_of_exclude_entry_is_not_excluded(e in abs_path()) {
            let parent = e.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("/"));
            prop_assume!(parent != e);
            prop_assert!(!excluded(&parent, std::slice::from_ref(&e)));
        }
    }
}
