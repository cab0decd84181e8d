//! Scope-aware bucket listings.

use bucketshare_entity::file::StorageItem;
use bucketshare_entity::scope::{Scope, ScopeType};

use super::resolver::is_item_in_scope;

/// Filter a listing down to the items visible under `scope`.
///
/// At the bucket root (`current_folder` absent or empty) a `specific`
/// scope replaces the real listing with one virtual folder per granted
/// path, named after its final segment and ordered by path.
pub fn filter_listing(
    scope: Option<&Scope>,
    current_folder: Option<&str>,
    items: Vec<StorageItem>,
) -> Vec<StorageItem> {
    let at_root = current_folder.is_none_or(|folder| folder.trim_matches('/').is_empty());

    match scope {
        Some(scope) if scope.scope_type == ScopeType::Specific && at_root => scope
            .folders
            .iter()
            .map(|folder| StorageItem::folder(folder.as_str()))
            .collect(),
        _ => retain_in_scope(scope, items),
    }
}

/// Keep only the items whose path is inside `scope`.
pub fn retain_in_scope(scope: Option<&Scope>, mut items: Vec<StorageItem>) -> Vec<StorageItem> {
    items.retain(|item| is_item_in_scope(scope, &item.path));
    items
}
