//! Permission domain types: the structured capability model, the legacy
//! flat-boolean encoding, and the actions checked against them.

pub mod action;
pub mod legacy;
pub mod structured;

pub use action::{Ownership, PermissionAction};
pub use legacy::LegacyPermission;
pub use structured::{Extra, StructuredPermission, UploadLevel, ViewLevel};
