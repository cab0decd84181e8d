//! Folder-scope matching and listing filtering.

pub mod listing;
pub mod resolver;

pub use listing::{filter_listing, retain_in_scope};
pub use resolver::{is_item_in_scope, matches_specific, normalize_item_path};
