//! Invitation lifecycle: create with an escalation check, accept once.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use bucketshare_core::config::access::AccessConfig;
use bucketshare_core::error::AppError;
use bucketshare_core::result::AppResult;
use bucketshare_entity::invitation::{Invitation, InvitationStatus};
use bucketshare_entity::member::Member;
use bucketshare_entity::permission::{LegacyPermission, PermissionAction};
use bucketshare_entity::scope::Scope;

use crate::bridge::effective_permission;
use crate::store::{BucketStore, InvitationStore, MemberStore, OwnershipStore};

use super::decision::{AccessRequest, DenyReason, check_share_expiry};
use super::gate::AccessGate;

/// Payload of an invitation as received from the inviter.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct InvitationRequest {
    /// Invitee email.
    #[validate(email)]
    pub email: String,
    /// Requested permission in legacy form.
    #[serde(default)]
    pub permission: LegacyPermission,
    /// Requested folder scope.
    #[serde(default)]
    pub scope: Scope,
}

/// Creates and accepts invitations.
#[derive(Clone)]
pub struct InvitationService {
    /// Access gate for inviter checks.
    gate: Arc<AccessGate>,
    /// Bucket lookups.
    buckets: Arc<dyn BucketStore>,
    /// Member rows created on acceptance.
    members: Arc<dyn MemberStore>,
    /// Invitation records.
    invitations: Arc<dyn InvitationStore>,
    /// Invitation lifetime.
    config: AccessConfig,
}

impl std::fmt::Debug for InvitationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvitationService").finish()
    }
}

impl InvitationService {
    /// Creates a new invitation service.
    pub fn new(
        gate: Arc<AccessGate>,
        buckets: Arc<dyn BucketStore>,
        members: Arc<dyn MemberStore>,
        invitations: Arc<dyn InvitationStore>,
        config: AccessConfig,
    ) -> Self {
        Self {
            gate,
            buckets,
            members,
            invitations,
            config,
        }
    }

    /// Creates a service and its gate over one store implementing every trait.
    pub fn from_store<S>(store: Arc<S>, config: AccessConfig) -> Self
    where
        S: BucketStore + MemberStore + InvitationStore + OwnershipStore,
    {
        let gate = Arc::new(AccessGate::from_store(store.clone(), config.clone()));
        Self::new(gate, store.clone(), store.clone(), store, config)
    }

    /// Invite `request.email` to `bucket_name` on behalf of `inviter`.
    ///
    /// The inviter needs `invite_members`, and unless it owns the bucket the
    /// requested permission and scope must be within its own.
    pub async fn invite(
        &self,
        inviter: &str,
        bucket_name: &str,
        request: InvitationRequest,
        now: DateTime<Utc>,
    ) -> AppResult<Invitation> {
        request.validate()?;

        let requested = effective_permission(&request.permission);
        self.gate
            .require(
                bucket_name,
                AccessRequest::new(inviter, PermissionAction::InviteMembers)
                    .with_grant(requested, request.scope.clone()),
            )
            .await?;

        let bucket = self
            .buckets
            .find_bucket(bucket_name)
            .await?
            .ok_or_else(|| DenyReason::NotFound.into_error())?;
        if bucket.is_owner(&request.email) {
            return Err(AppError::conflict("The bucket owner cannot be invited"));
        }
        if self
            .members
            .find_member(&request.email, bucket_name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "'{}' is already a member of '{bucket_name}'",
                request.email
            )));
        }

        let invitation = Invitation {
            token: Uuid::new_v4().simple().to_string(),
            bucket_name: bucket_name.to_string(),
            email: request.email,
            permission: request.permission,
            scope: request.scope,
            created_by: inviter.to_string(),
            created_at: now,
            expires_at: now + Duration::seconds(self.config.invitation_ttl_seconds()),
            accepted: false,
        };
        self.invitations.create_invitation(invitation.clone()).await?;

        info!(
            inviter,
            bucket = %bucket_name,
            invitee = %invitation.email,
            expires_at = %invitation.expires_at,
            "Invitation created"
        );

        Ok(invitation)
    }

    /// Accept the invitation `token` as `email`.
    ///
    /// Fails with `NotFound` for an unknown token, `Authorization` when the
    /// email does not match, `Conflict` when already accepted (including a
    /// concurrent acceptance that won the race), and `Expired` past expiry.
    pub async fn accept(&self, token: &str, email: &str, now: DateTime<Utc>) -> AppResult<Member> {
        let invitation = self
            .invitations
            .find_invitation(token)
            .await?
            .ok_or_else(|| AppError::not_found("Invitation not found"))?;

        if invitation.email != email {
            return Err(DenyReason::Forbidden.into_error());
        }
        if invitation.accepted {
            return Err(AppError::conflict("Invitation was already accepted"));
        }
        check_share_expiry(Some(invitation.expires_at), now).into_result()?;

        if !self.invitations.mark_accepted(token).await? {
            return Err(AppError::conflict("Invitation was already accepted"));
        }

        let member = self
            .members
            .upsert_member(Member::new(
                invitation.email,
                invitation.bucket_name,
                invitation.permission,
                invitation.scope,
                Some(invitation.created_by),
                now,
            ))
            .await?;

        info!(email = %member.email, bucket = %member.bucket_name, "Invitation accepted");
        Ok(member)
    }

    /// Status of the invitation `token` at `now`.
    pub async fn status(&self, token: &str, now: DateTime<Utc>) -> AppResult<InvitationStatus> {
        self.invitations
            .find_invitation(token)
            .await?
            .map(|invitation| invitation.status(now))
            .ok_or_else(|| AppError::not_found("Invitation not found"))
    }
}
