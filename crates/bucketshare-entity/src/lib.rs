//! # bucketshare-entity
//!
//! Domain entity models for Bucketshare. Persisted records (`Member`,
//! `Invitation`, `FileOwnershipRecord`, `Bucket`) derive `sqlx::FromRow`
//! with permission and scope stored as JSON columns. The structured
//! permission model and its dependency rules live in [`permission`].

pub mod bucket;
pub mod file;
pub mod invitation;
pub mod member;
pub mod permission;
pub mod scope;
