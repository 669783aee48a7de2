//! Materialized path helpers.
//!
//! A folder's `path` column holds the ids of its ancestors, root first,
//! joined and terminated by `/`. The Root folder's path is `/`; a folder
//! two levels below it has a path like `/<root-id>/<parent-id>/`. The
//! folder's own id never appears in its own path, so descendant queries
//! and cycle checks reduce to string-prefix tests.

use famvault_core::types::FolderId;

/// The materialized path of every family's Root folder.
pub const ROOT_PATH: &str = "/";

/// The path every child of the given folder carries.
///
/// This is also the prefix shared by every transitive descendant, which
/// is what makes the descendant query a single prefix match.
pub fn child_prefix(parent_path: &str, parent_id: FolderId) -> String {
    format!("{parent_path}{parent_id}/")
}

/// Check whether `candidate_path` denotes a descendant of the folder with
/// the given path and id.
///
/// UUID segments are fixed-width and `/`-delimited on both sides, so a
/// prefix match can never straddle a segment boundary.
pub fn is_descendant_path(candidate_path: &str, ancestor_path: &str, ancestor_id: FolderId) -> bool {
    candidate_path.starts_with(&child_prefix(ancestor_path, ancestor_id))
}

/// Rewrite a descendant path after its ancestor moved by swapping the old
/// subtree prefix for the new one. Returns `None` when the path does not
/// carry the old prefix (i.e. the folder was not a descendant).
pub fn rebase(path: &str, old_prefix: &str, new_prefix: &str) -> Option<String> {
    path.strip_prefix(old_prefix)
        .map(|rest| format!("{new_prefix}{rest}"))
}

/// Number of ancestors encoded in a path (0 for the Root).
pub fn depth(path: &str) -> usize {
    path.matches('/').count().saturating_sub(1)
}

/// The ancestor folder ids encoded in a path, nearest ancestor first.
///
/// For a folder with path `/<root>/<a>/<b>/` this yields `[b, a, root]`,
/// which is exactly the order the permission resolver walks a file's
/// folder chain (outward to the Root).
pub fn ancestor_ids_outward(path: &str) -> Vec<FolderId> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| segment.parse().ok())
        .rev()
        .collect()
}
