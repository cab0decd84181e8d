//! Async access gate: loads records from the stores and applies the pure
//! decision.

use std::sync::Arc;

use tracing::{debug, info, warn};

use bucketshare_core::config::access::AccessConfig;
use bucketshare_core::result::AppResult;
use bucketshare_entity::file::StorageItem;
use bucketshare_entity::member::Member;
use bucketshare_entity::permission::{PermissionAction, ViewLevel};

use crate::bridge::effective_permission;
use crate::scope::{filter_listing, normalize_item_path, retain_in_scope};
use crate::store::{BucketStore, MemberStore, OwnershipStore};

use super::decision::{AccessRequest, Decision, DenyReason, authorize, ownership_of};

/// Loads bucket, member, and ownership records and decides access.
#[derive(Clone)]
pub struct AccessGate {
    /// Bucket lookups.
    buckets: Arc<dyn BucketStore>,
    /// Member lookups.
    members: Arc<dyn MemberStore>,
    /// Upload ownership lookups.
    ownership: Arc<dyn OwnershipStore>,
    /// Listing behavior.
    config: AccessConfig,
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("config", &self.config)
            .finish()
    }
}

impl AccessGate {
    /// Creates a new gate over separate stores.
    pub fn new(
        buckets: Arc<dyn BucketStore>,
        members: Arc<dyn MemberStore>,
        ownership: Arc<dyn OwnershipStore>,
        config: AccessConfig,
    ) -> Self {
        Self {
            buckets,
            members,
            ownership,
            config,
        }
    }

    /// Creates a gate over one store implementing every trait.
    pub fn from_store<S>(store: Arc<S>, config: AccessConfig) -> Self
    where
        S: BucketStore + MemberStore + OwnershipStore,
    {
        Self::new(store.clone(), store.clone(), store, config)
    }

    /// Decide `request` on `bucket_name`.
    ///
    /// A missing bucket yields `Deny(NotFound)`. Item paths are stripped of
    /// surrounding slashes. For rename/delete without explicit ownership,
    /// ownership is resolved from the upload records.
    pub async fn authorize(
        &self,
        bucket_name: &str,
        mut request: AccessRequest,
    ) -> AppResult<Decision> {
        let Some(bucket) = self.buckets.find_bucket(bucket_name).await? else {
            info!(actor = %request.actor, bucket = %bucket_name, "Access denied: bucket not found");
            return Ok(Decision::Deny(DenyReason::NotFound));
        };

        request.items = request
            .items
            .iter()
            .map(|path| normalize_item_path(path).to_string())
            .collect();

        let member = if bucket.is_owner(&request.actor) {
            None
        } else {
            self.members.find_member(&request.actor, bucket_name).await?
        };

        if request.ownership.is_none() && request.action.depends_on_ownership() {
            let records = self.ownership.find_owners(bucket_name, &request.items).await?;
            request.ownership = ownership_of(&request.items, &request.actor, &records);
        }

        let decision = authorize(&bucket, member.as_ref(), &request);

        match decision {
            Decision::Allow => debug!(
                actor = %request.actor,
                bucket = %bucket_name,
                action = %request.action,
                items = request.items.len(),
                "Access allowed"
            ),
            Decision::Deny(DenyReason::EscalationDenied) => warn!(
                actor = %request.actor,
                bucket = %bucket_name,
                action = %request.action,
                "Escalation attempt denied"
            ),
            Decision::Deny(reason) => info!(
                actor = %request.actor,
                bucket = %bucket_name,
                action = %request.action,
                reason = %reason,
                "Access denied"
            ),
        }

        Ok(decision)
    }

    /// Like [`authorize`](Self::authorize), but a denial becomes an error.
    pub async fn require(&self, bucket_name: &str, request: AccessRequest) -> AppResult<()> {
        self.authorize(bucket_name, request).await?.into_result()
    }

    /// Load the actor's member record, or `None` for the owner.
    ///
    /// Fails with `NotFound` for an unknown bucket and `Authorization` for
    /// a non-member.
    pub async fn member_for(&self, actor: &str, bucket_name: &str) -> AppResult<Option<Member>> {
        let Some(bucket) = self.buckets.find_bucket(bucket_name).await? else {
            return Err(DenyReason::NotFound.into_error());
        };
        if bucket.is_owner(actor) {
            return Ok(None);
        }
        match self.members.find_member(actor, bucket_name).await? {
            Some(member) => Ok(Some(member)),
            None => Err(DenyReason::Forbidden.into_error()),
        }
    }

    /// Filter a bucket listing for `actor`.
    ///
    /// Owners see everything. Members need view access; they see items in
    /// their scope, and with `view_own` only folders and their own uploads.
    pub async fn filter_listing(
        &self,
        actor: &str,
        bucket_name: &str,
        current_folder: Option<&str>,
        items: Vec<StorageItem>,
    ) -> AppResult<Vec<StorageItem>> {
        self.require(
            bucket_name,
            AccessRequest::new(actor, PermissionAction::ViewFiles),
        )
        .await?;

        let Some(member) = self.member_for(actor, bucket_name).await? else {
            return Ok(items);
        };

        let mut visible = if self.config.synthesize_root_folders {
            filter_listing(Some(&member.scope), current_folder, items)
        } else {
            retain_in_scope(Some(&member.scope), items)
        };

        if effective_permission(&member.permission).view == ViewLevel::ViewOwn {
            let file_paths: Vec<String> = visible
                .iter()
                .filter(|item| !item.is_folder)
                .map(|item| item.path.clone())
                .collect();
            let records = self.ownership.find_owners(bucket_name, &file_paths).await?;
            visible.retain(|item| {
                item.is_folder
                    || records
                        .iter()
                        .any(|r| r.file_path == item.path && r.is_owned_by(actor))
            });
        }

        debug!(actor, bucket = %bucket_name, count = visible.len(), "Filtered listing");
        Ok(visible)
    }
}
