//! Bucket member domain entity.

pub mod model;

pub use model::Member;
