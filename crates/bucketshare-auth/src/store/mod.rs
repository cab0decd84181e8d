//! Persistence traits consumed by the access gate and lifecycle services.
//!
//! Implementations own their storage layout. Two contracts must hold:
//! - [`MemberStore::upsert_member`] keeps at most one row per
//!   `(email, bucket_name)`;
//! - [`InvitationStore::mark_accepted`] flips `accepted` atomically and
//!   reports whether this call performed the transition.

pub mod memory;

use async_trait::async_trait;

use bucketshare_core::result::AppResult;
use bucketshare_entity::bucket::Bucket;
use bucketshare_entity::file::FileOwnershipRecord;
use bucketshare_entity::invitation::Invitation;
use bucketshare_entity::member::Member;

pub use memory::{MemoryStore, StoreFixture};

/// Bucket lookups.
#[async_trait]
pub trait BucketStore: Send + Sync + 'static {
    /// Find a bucket by name.
    async fn find_bucket(&self, name: &str) -> AppResult<Option<Bucket>>;
}

/// Member records keyed by `(email, bucket_name)`.
#[async_trait]
pub trait MemberStore: Send + Sync + 'static {
    /// Find the member record for `email` on `bucket_name`.
    async fn find_member(&self, email: &str, bucket_name: &str) -> AppResult<Option<Member>>;

    /// List every member of a bucket.
    async fn list_members(&self, bucket_name: &str) -> AppResult<Vec<Member>>;

    /// Insert or replace the row for the member's identity key.
    ///
    /// An existing row keeps its `created_at`. Returns the stored row.
    async fn upsert_member(&self, member: Member) -> AppResult<Member>;

    /// Remove a member. Returns `true` if a row was deleted.
    async fn remove_member(&self, email: &str, bucket_name: &str) -> AppResult<bool>;
}

/// Invitation records keyed by token.
#[async_trait]
pub trait InvitationStore: Send + Sync + 'static {
    /// Store a new invitation.
    async fn create_invitation(&self, invitation: Invitation) -> AppResult<()>;

    /// Find an invitation by token.
    async fn find_invitation(&self, token: &str) -> AppResult<Option<Invitation>>;

    /// Mark a pending invitation accepted.
    ///
    /// Returns `false` if it was already accepted or does not exist.
    async fn mark_accepted(&self, token: &str) -> AppResult<bool>;
}

/// Upload ownership records keyed by `(bucket_name, file_path)`.
#[async_trait]
pub trait OwnershipStore: Send + Sync + 'static {
    /// Record (or replace) the uploader of a file.
    async fn record_owner(&self, record: FileOwnershipRecord) -> AppResult<()>;

    /// Find the records for the given paths. Paths without a record are
    /// omitted.
    async fn find_owners(
        &self,
        bucket_name: &str,
        paths: &[String],
    ) -> AppResult<Vec<FileOwnershipRecord>>;

    /// Remove the record for a deleted file. Returns `true` if one existed.
    async fn remove_owner(&self, bucket_name: &str, file_path: &str) -> AppResult<bool>;
}
