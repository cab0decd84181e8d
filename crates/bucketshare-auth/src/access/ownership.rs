//! Upload ownership bookkeeping.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use bucketshare_core::result::AppResult;
use bucketshare_entity::file::FileOwnershipRecord;
use bucketshare_entity::permission::PermissionAction;

use crate::scope::normalize_item_path;
use crate::store::OwnershipStore;

use super::decision::AccessRequest;
use super::gate::AccessGate;

/// Records who uploaded which file, after checking the actor may do so.
#[derive(Clone)]
pub struct OwnershipService {
    /// Access gate for upload/delete checks.
    gate: Arc<AccessGate>,
    /// Ownership records.
    ownership: Arc<dyn OwnershipStore>,
}

impl std::fmt::Debug for OwnershipService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnershipService").finish()
    }
}

impl OwnershipService {
    /// Creates a new ownership service.
    pub fn new(gate: Arc<AccessGate>, ownership: Arc<dyn OwnershipStore>) -> Self {
        Self { gate, ownership }
    }

    /// Check `upload` on `file_path` and record `actor` as its uploader.
    pub async fn record_upload(
        &self,
        actor: &str,
        bucket_name: &str,
        file_path: &str,
        now: DateTime<Utc>,
    ) -> AppResult<FileOwnershipRecord> {
        let file_path = normalize_item_path(file_path);
        self.gate
            .require(
                bucket_name,
                AccessRequest::new(actor, PermissionAction::Upload).with_items([file_path]),
            )
            .await?;

        let record = FileOwnershipRecord {
            bucket_name: bucket_name.to_string(),
            file_path: file_path.to_string(),
            uploader_email: actor.to_string(),
            created_at: now,
        };
        self.ownership.record_owner(record.clone()).await?;

        debug!(actor, bucket = %bucket_name, path = %file_path, "Recorded upload owner");
        Ok(record)
    }

    /// Check `delete_file` on `file_path` and drop its ownership record.
    ///
    /// Returns whether a record existed.
    pub async fn record_delete(
        &self,
        actor: &str,
        bucket_name: &str,
        file_path: &str,
    ) -> AppResult<bool> {
        let file_path = normalize_item_path(file_path);
        self.gate
            .require(
                bucket_name,
                AccessRequest::new(actor, PermissionAction::DeleteFile).with_items([file_path]),
            )
            .await?;

        let removed = self.ownership.remove_owner(bucket_name, file_path).await?;
        debug!(actor, bucket = %bucket_name, path = %file_path, removed, "Dropped upload owner");
        Ok(removed)
    }
}
