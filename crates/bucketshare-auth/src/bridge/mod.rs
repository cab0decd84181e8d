//! Conversion between the legacy flag encoding and structured permissions.

pub mod legacy;

pub use legacy::{effective_permission, from_legacy, to_legacy};
