//! # bucketshare-core
//!
//! Core crate for Bucketshare. Contains configuration schemas and the
//! unified error system shared by the entity, auth, and CLI layers.
//!
//! This crate has **no** internal dependencies on other Bucketshare crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
