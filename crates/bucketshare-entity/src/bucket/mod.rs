//! Connected storage bucket.

pub mod model;

pub use model::Bucket;
