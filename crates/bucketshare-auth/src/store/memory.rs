//! In-memory store backed by `dashmap`.
//!
//! Suitable for tests, the CLI, and single-node embedding. Upserts and the
//! invitation acceptance flip run under the map's shard lock for the key,
//! which gives the per-key atomicity the store contracts require.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::{Deserialize, Serialize};
use tracing::debug;

use bucketshare_core::result::AppResult;
use bucketshare_entity::bucket::Bucket;
use bucketshare_entity::file::FileOwnershipRecord;
use bucketshare_entity::invitation::Invitation;
use bucketshare_entity::member::Member;

use super::{BucketStore, InvitationStore, MemberStore, OwnershipStore};

/// Serializable snapshot used to seed a [`MemoryStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreFixture {
    /// Connected buckets.
    #[serde(default)]
    pub buckets: Vec<Bucket>,
    /// Member rows.
    #[serde(default)]
    pub members: Vec<Member>,
    /// Pending or accepted invitations.
    #[serde(default)]
    pub invitations: Vec<Invitation>,
    /// Upload ownership records.
    #[serde(default)]
    pub ownership: Vec<FileOwnershipRecord>,
}

/// Implements every store trait over concurrent hash maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    buckets: DashMap<String, Bucket>,
    members: DashMap<(String, String), Member>,
    invitations: DashMap<String, Invitation>,
    ownership: DashMap<(String, String), FileOwnershipRecord>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded from a fixture.
    pub fn from_fixture(fixture: StoreFixture) -> Self {
        let store = Self::new();
        for bucket in fixture.buckets {
            store.insert_bucket(bucket);
        }
        for member in fixture.members {
            store.members.insert(member.key(), member);
        }
        for invitation in fixture.invitations {
            store.invitations.insert(invitation.token.clone(), invitation);
        }
        for record in fixture.ownership {
            store
                .ownership
                .insert((record.bucket_name.clone(), record.file_path.clone()), record);
        }
        store
    }

    /// Insert or replace a bucket.
    pub fn insert_bucket(&self, bucket: Bucket) {
        self.buckets.insert(bucket.name.clone(), bucket);
    }

    /// Number of member rows across all buckets.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

#[async_trait]
impl BucketStore for MemoryStore {
    async fn find_bucket(&self, name: &str) -> AppResult<Option<Bucket>> {
        Ok(self.buckets.get(name).map(|b| b.value().clone()))
    }
}

#[async_trait]
impl MemberStore for MemoryStore {
    async fn find_member(&self, email: &str, bucket_name: &str) -> AppResult<Option<Member>> {
        Ok(self
            .members
            .get(&(email.to_string(), bucket_name.to_string()))
            .map(|m| m.value().clone()))
    }

    async fn list_members(&self, bucket_name: &str) -> AppResult<Vec<Member>> {
        let mut members: Vec<Member> = self
            .members
            .iter()
            .filter(|entry| entry.value().bucket_name == bucket_name)
            .map(|entry| entry.value().clone())
            .collect();
        members.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(members)
    }

    async fn upsert_member(&self, member: Member) -> AppResult<Member> {
        let stored = match self.members.entry(member.key()) {
            Entry::Occupied(mut occupied) => {
                let existing = occupied.get_mut();
                existing.permission = member.permission;
                existing.scope = member.scope;
                existing.updated_at = member.updated_at;
                if existing.invited_by.is_none() {
                    existing.invited_by = member.invited_by;
                }
                existing.clone()
            }
            Entry::Vacant(vacant) => vacant.insert(member).value().clone(),
        };
        debug!(email = %stored.email, bucket = %stored.bucket_name, "Upserted member");
        Ok(stored)
    }

    async fn remove_member(&self, email: &str, bucket_name: &str) -> AppResult<bool> {
        Ok(self
            .members
            .remove(&(email.to_string(), bucket_name.to_string()))
            .is_some())
    }
}

#[async_trait]
impl InvitationStore for MemoryStore {
    async fn create_invitation(&self, invitation: Invitation) -> AppResult<()> {
        self.invitations.insert(invitation.token.clone(), invitation);
        Ok(())
    }

    async fn find_invitation(&self, token: &str) -> AppResult<Option<Invitation>> {
        Ok(self.invitations.get(token).map(|i| i.value().clone()))
    }

    async fn mark_accepted(&self, token: &str) -> AppResult<bool> {
        let Some(mut invitation) = self.invitations.get_mut(token) else {
            return Ok(false);
        };
        if invitation.accepted {
            return Ok(false);
        }
        invitation.accepted = true;
        Ok(true)
    }
}

#[async_trait]
impl OwnershipStore for MemoryStore {
    async fn record_owner(&self, record: FileOwnershipRecord) -> AppResult<()> {
        self.ownership
            .insert((record.bucket_name.clone(), record.file_path.clone()), record);
        Ok(())
    }

    async fn find_owners(
        &self,
        bucket_name: &str,
        paths: &[String],
    ) -> AppResult<Vec<FileOwnershipRecord>> {
        Ok(paths
            .iter()
            .filter_map(|path| {
                self.ownership
                    .get(&(bucket_name.to_string(), path.clone()))
                    .map(|r| r.value().clone())
            })
            .collect())
    }

    async fn remove_owner(&self, bucket_name: &str, file_path: &str) -> AppResult<bool> {
        Ok(self
            .ownership
            .remove(&(bucket_name.to_string(), file_path.to_string()))
            .is_some())
    }
}
