//! Bucket entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An object-storage bucket connected by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Bucket {
    /// Bucket name, unique per deployment.
    pub name: String,
    /// Email of the connecting owner.
    pub owner_email: String,
    /// When the bucket was connected.
    pub created_at: DateTime<Utc>,
}

impl Bucket {
    /// Create a bucket record.
    pub fn new(name: impl Into<String>, owner_email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            owner_email: owner_email.into(),
            created_at: now,
        }
    }

    /// Whether `email` is the bucket owner.
    pub fn is_owner(&self, email: &str) -> bool {
        self.owner_email == email
    }
}
