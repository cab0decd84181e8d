//! Folder-level restriction layered on top of a permission.

pub mod model;

pub use model::{Scope, ScopeType};
