//! File ownership record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maps an uploaded file to the email of its uploader.
///
/// Created on upload, removed when the file is deleted, otherwise
/// immutable. Only consulted for "manage own files" checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FileOwnershipRecord {
    /// Bucket holding the file.
    pub bucket_name: String,
    /// Object path without leading slash.
    pub file_path: String,
    /// Uploader email.
    pub uploader_email: String,
    /// When the upload was recorded.
    pub created_at: DateTime<Utc>,
}

impl FileOwnershipRecord {
    /// Whether `email` uploaded this file.
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.uploader_email == email
    }
}
