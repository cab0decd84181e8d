//! Decides whether a storage path falls inside a member's scope.
//!
//! Matching rules:
//! - `entire` (or no scope at all) matches every path.
//! - `specific` matches a granted folder itself, anything below it, and
//!   every ancestor directory on the way down to it, so a scoped member can
//!   navigate from the bucket root to its folders. Matching is anchored on
//!   `/` boundaries.
//! - `nested` is an unanchored two-way prefix test: `projects/20` matches
//!   `projects/2024`, and so does `proj`. This is looser than `specific`
//!   and is kept as-is.

use bucketshare_entity::scope::{Scope, ScopeType};

/// Whether `item_path` is visible under `scope`.
///
/// Paths must not carry a leading or trailing slash; see
/// [`normalize_item_path`].
pub fn is_item_in_scope(scope: Option<&Scope>, item_path: &str) -> bool {
    let Some(scope) = scope else {
        return true;
    };

    match scope.scope_type {
        ScopeType::Entire => true,
        ScopeType::Specific => scope
            .folders
            .iter()
            .any(|folder| matches_specific(folder, item_path)),
        ScopeType::Nested => scope
            .folders
            .iter()
            .any(|folder| item_path.starts_with(folder.as_str()) || folder.starts_with(item_path)),
    }
}

/// Anchored match of `item_path` against one granted `folder`: equal,
/// descendant, or ancestor.
pub fn matches_specific(folder: &str, item_path: &str) -> bool {
    item_path == folder || is_below(item_path, folder) || is_below(folder, item_path)
}

/// Whether `path` starts with `prefix` followed by `/`.
fn is_below(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Strip leading and trailing slashes from a raw object key.
pub fn normalize_item_path(path: &str) -> &str {
    path.trim_matches('/')
}
