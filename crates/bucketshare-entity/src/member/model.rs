//! Member entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::permission::LegacyPermission;
use crate::scope::Scope;

/// A collaborator on a bucket.
///
/// Identity is `(email, bucket_name)`; at most one row exists per pair.
/// The permission is kept in its persisted legacy form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Member {
    /// Member email.
    pub email: String,
    /// Bucket the membership applies to.
    pub bucket_name: String,
    /// Stored permission flags.
    #[sqlx(json)]
    pub permission: LegacyPermission,
    /// Folder scope.
    #[sqlx(json)]
    pub scope: Scope,
    /// Email of whoever invited this member.
    pub invited_by: Option<String>,
    /// When the membership was created.
    pub created_at: DateTime<Utc>,
    /// When the permission or scope last changed.
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Create a new membership record.
    pub fn new(
        email: impl Into<String>,
        bucket_name: impl Into<String>,
        permission: LegacyPermission,
        scope: Scope,
        invited_by: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            email: email.into(),
            bucket_name: bucket_name.into(),
            permission,
            scope,
            invited_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// The `(email, bucket_name)` identity key.
    pub fn key(&self) -> (String, String) {
        (self.email.clone(), self.bucket_name.clone())
    }
}
