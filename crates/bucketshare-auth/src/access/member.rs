//! Member permission updates and removal.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use bucketshare_core::error::AppError;
use bucketshare_core::result::AppResult;
use bucketshare_entity::member::Member;
use bucketshare_entity::permission::{PermissionAction, StructuredPermission};
use bucketshare_entity::scope::Scope;

use crate::bridge::{effective_permission, to_legacy};
use crate::escalation::check_grant;
use crate::store::{BucketStore, MemberStore};

use super::decision::{AccessRequest, DenyReason};
use super::gate::AccessGate;

/// Changes and removes member records.
#[derive(Clone)]
pub struct MemberService {
    /// Access gate for actor checks.
    gate: Arc<AccessGate>,
    /// Bucket lookups.
    buckets: Arc<dyn BucketStore>,
    /// Member rows.
    members: Arc<dyn MemberStore>,
}

impl std::fmt::Debug for MemberService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberService").finish()
    }
}

impl MemberService {
    /// Creates a new member service.
    pub fn new(
        gate: Arc<AccessGate>,
        buckets: Arc<dyn BucketStore>,
        members: Arc<dyn MemberStore>,
    ) -> Self {
        Self {
            gate,
            buckets,
            members,
        }
    }

    /// Replace the permission and scope of `email` on `bucket_name`.
    ///
    /// The owner may set anything. A member needs `invite_members`, may only
    /// hand out a subset of its own permission and scope, and may only touch
    /// members whose current access is already within its own. The value is
    /// stored in legacy form and checked as it reads back, so a manage level
    /// brings `delete_folders` along with it.
    pub async fn update_permission(
        &self,
        actor: &str,
        bucket_name: &str,
        email: &str,
        permission: StructuredPermission,
        scope: Scope,
        now: DateTime<Utc>,
    ) -> AppResult<Member> {
        let legacy = to_legacy(&permission.normalize());
        let effective = effective_permission(&legacy);
        self.gate
            .require(
                bucket_name,
                AccessRequest::new(actor, PermissionAction::InviteMembers)
                    .with_grant(effective.clone(), scope.clone()),
            )
            .await?;

        let mut member = self
            .members
            .find_member(email, bucket_name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("'{email}' is not a member")))?;

        if let Some(grantor) = self.gate.member_for(actor, bucket_name).await? {
            let current = effective_permission(&member.permission);
            if let Err(denial) = check_grant(
                &effective_permission(&grantor.permission),
                &grantor.scope,
                &current,
                &member.scope,
            ) {
                warn!(
                    actor,
                    bucket = %bucket_name,
                    member = %email,
                    %denial,
                    "Update of a member above the actor denied"
                );
                return Err(DenyReason::EscalationDenied.into_error());
            }
        }

        member.permission = legacy;
        member.scope = scope;
        member.updated_at = now;
        let stored = self.members.upsert_member(member).await?;

        info!(
            actor,
            bucket = %bucket_name,
            member = %email,
            permission = %effective,
            "Member permission updated"
        );
        Ok(stored)
    }

    /// Remove `email` from `bucket_name`. Owner only.
    pub async fn remove(&self, actor: &str, bucket_name: &str, email: &str) -> AppResult<()> {
        let bucket = self
            .buckets
            .find_bucket(bucket_name)
            .await?
            .ok_or_else(|| DenyReason::NotFound.into_error())?;
        if !bucket.is_owner(actor) {
            return Err(DenyReason::Forbidden.into_error());
        }

        if !self.members.remove_member(email, bucket_name).await? {
            return Err(AppError::not_found(format!("'{email}' is not a member")));
        }

        info!(actor, bucket = %bucket_name, member = %email, "Member removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bucketshare_core::config::access::AccessConfig;
    use bucketshare_core::error::ErrorKind;
    use bucketshare_entity::bucket::Bucket;
    use bucketshare_entity::permission::{Extra, LegacyPermission, UploadLevel, ViewLevel};

    use crate::store::MemoryStore;

    use super::*;

    const OWNER: &str = "owner@example.com";

    async fn setup() -> (Arc<MemoryStore>, MemberService) {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        store.insert_bucket(Bucket::new("photos", OWNER, now));
        store
            .upsert_member(Member::new(
                "lead@example.com",
                "photos",
                LegacyPermission {
                    view_download: true,
                    invite_members: true,
                    ..Default::default()
                },
                Scope::specific(["projects"]),
                None,
                now,
            ))
            .await
            .unwrap();
        store
            .upsert_member(Member::new(
                "alice@example.com",
                "photos",
                LegacyPermission {
                    view_only: true,
                    ..Default::default()
                },
                Scope::specific(["projects/2024"]),
                Some("lead@example.com".to_string()),
                now,
            ))
            .await
            .unwrap();
        let gate = Arc::new(AccessGate::from_store(store.clone(), AccessConfig::default()));
        let service = MemberService::new(gate, store.clone(), store.clone());
        (store, service)
    }

    #[tokio::test]
    async fn test_owner_sets_any_permission() {
        let (_, service) = setup().await;
        let full = StructuredPermission::full();
        let member = service
            .update_permission(OWNER, "photos", "alice@example.com", full, Scope::entire(), Utc::now())
            .await
            .unwrap();
        let stored = effective_permission(&member.permission);
        assert_eq!(stored.upload, UploadLevel::UploadManageAll);
        // delete_folders has no legacy flag but returns via delete_files.
        assert!(stored.has_extra(Extra::DeleteFolders));
        assert!(member.scope.is_entire());
    }

    #[tokio::test]
    async fn test_member_grants_within_itself() {
        let (_, service) = setup().await;
        let permission =
            StructuredPermission::new(ViewLevel::ViewAll, UploadLevel::None, [Extra::Download]);
        let member = service
            .update_permission(
                "lead@example.com",
                "photos",
                "alice@example.com",
                permission.clone(),
                Scope::specific(["projects/2024"]),
                Utc::now(),
            )
            .await
            .unwrap();
        assert_eq!(effective_permission(&member.permission), permission);
    }

    #[tokio::test]
    async fn test_member_escalation_is_denied() {
        let (store, service) = setup().await;
        let permission = StructuredPermission::new(
            ViewLevel::ViewAll,
            UploadLevel::UploadManageAll,
            [Extra::Download],
        );
        let err = service
            .update_permission(
                "lead@example.com",
                "photos",
                "alice@example.com",
                permission,
                Scope::specific(["projects"]),
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let unchanged = store
            .find_member("alice@example.com", "photos")
            .await
            .unwrap()
            .unwrap();
        assert!(unchanged.permission.view_only);
        assert!(!unchanged.permission.upload_view_all);
    }

    #[tokio::test]
    async fn test_update_unknown_member_is_not_found() {
        let (_, service) = setup().await;
        let err = service
            .update_permission(
                OWNER,
                "photos",
                "ghost@example.com",
                StructuredPermission::none(),
                Scope::entire(),
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_only_owner_removes() {
        let (store, service) = setup().await;
        let err = service
            .remove("lead@example.com", "photos", "alice@example.com")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        service.remove(OWNER, "photos", "alice@example.com").await.unwrap();
        assert_eq!(store.member_count(), 1);

        let err = service
            .remove(OWNER, "photos", "alice@example.com")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    async fn add_member(store: &MemoryStore, email: &str, permission: LegacyPermission, scope: Scope) {
        store
            .upsert_member(Member::new(email, "photos", permission, scope, None, Utc::now()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_grant_is_checked_as_it_reads_back() {
        let (store, service) = setup().await;
        add_member(
            &store,
            "manager@example.com",
            LegacyPermission {
                upload_view_all: true,
                invite_members: true,
                ..Default::default()
            },
            Scope::entire(),
        )
        .await;

        // Stored as uploadViewAll + deleteFiles, which reads back with delete_folders.
        let manage_all = StructuredPermission::new(ViewLevel::ViewAll, UploadLevel::UploadManageAll, []);
        let err = service
            .update_permission(
                "manager@example.com",
                "photos",
                "alice@example.com",
                manage_all,
                Scope::specific(["projects/2024"]),
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert_eq!(err.message, DenyReason::EscalationDenied.message());

        let alice = store
            .find_member("alice@example.com", "photos")
            .await
            .unwrap()
            .unwrap();
        assert!(!effective_permission(&alice.permission).has_extra(Extra::DeleteFolders));
        assert!(!alice.permission.upload_view_all);
    }

    #[tokio::test]
    async fn test_member_cannot_rewrite_member_above_itself() {
        let (store, service) = setup().await;
        let boss_flags = LegacyPermission {
            upload_view_all: true,
            view_download: true,
            invite_members: true,
            ..Default::default()
        };
        add_member(&store, "boss@example.com", boss_flags, Scope::entire()).await;

        let err = service
            .update_permission(
                "lead@example.com",
                "photos",
                "boss@example.com",
                StructuredPermission::none(),
                Scope::specific(["projects"]),
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert_eq!(err.message, DenyReason::EscalationDenied.message());

        let boss = store
            .find_member("boss@example.com", "photos")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(boss.permission, boss_flags);
        assert!(boss.scope.is_entire());

        // The owner is not bound by the target's current access.
        service
            .update_permission(
                OWNER,
                "photos",
                "boss@example.com",
                StructuredPermission::none(),
                Scope::specific(["projects"]),
                Utc::now(),
            )
            .await
            .unwrap();
    }
}
