//! The access decision façade.
//!
//! Resolution order:
//! 1. Owner check: the bucket owner may do anything.
//! 2. Membership: non-owners need a member record for the bucket.
//! 3. Capability: the member's normalized permission must cover the action.
//! 4. Scope: every target item must be inside the member's scope.
//! 5. Escalation: grants (invitations, permission updates) must stay
//!    within the grantor's own permission and scope.
//!
//! Every decision is a snapshot over the values passed in. Callers that
//! need stronger guarantees re-fetch and re-check immediately before the
//! side effect.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bucketshare_core::error::AppError;
use bucketshare_entity::bucket::Bucket;
use bucketshare_entity::file::FileOwnershipRecord;
use bucketshare_entity::member::Member;
use bucketshare_entity::permission::{Ownership, PermissionAction, StructuredPermission};
use bucketshare_entity::scope::Scope;

use crate::bridge::effective_permission;
use crate::escalation::check_grant;
use crate::scope::is_item_in_scope;

/// Why an access request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The actor lacks the base capability for the action.
    Forbidden,
    /// The capability is present but an item is outside the actor's folders.
    ScopeViolation,
    /// A grant asks for more than the grantor holds.
    EscalationDenied,
    /// The bucket or member record does not exist.
    NotFound,
    /// The invitation or share token is past its expiry.
    Expired,
}

impl DenyReason {
    /// Message surfaced to the end user.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Forbidden => "You do not have permission to perform this action",
            Self::ScopeViolation => "The requested item is outside your permitted folders",
            Self::EscalationDenied => "You cannot grant permissions you do not hold",
            Self::NotFound => "The requested bucket or member does not exist",
            Self::Expired => "This link or invitation has expired",
        }
    }

    /// The [`AppError`] surfaced for this reason.
    pub fn into_error(self) -> AppError {
        match self {
            Self::NotFound => AppError::not_found(self.message()),
            Self::Expired => AppError::expired(self.message()),
            Self::Forbidden | Self::ScopeViolation | Self::EscalationDenied => {
                AppError::authorization(self.message())
            }
        }
    }

    /// Return the reason as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forbidden => "forbidden",
            Self::ScopeViolation => "scope_violation",
            Self::EscalationDenied => "escalation_denied",
            Self::NotFound => "not_found",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Verdict of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    /// The action may proceed.
    Allow,
    /// The action must not proceed.
    Deny(DenyReason),
}

impl Decision {
    /// Whether the verdict allows the action.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// The denial reason, if any.
    pub fn reason(&self) -> Option<DenyReason> {
        match self {
            Self::Allow => None,
            Self::Deny(reason) => Some(*reason),
        }
    }

    /// Convert a denial into the matching [`AppError`].
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => Err(reason.into_error()),
        }
    }
}

/// A permission and scope being handed to someone else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRequest {
    /// Requested permission.
    pub permission: StructuredPermission,
    /// Requested scope.
    pub scope: Scope,
}

/// One access question: may `actor` perform `action` on `items`?
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    /// Acting user's email.
    pub actor: String,
    /// Action being attempted.
    pub action: PermissionAction,
    /// Target item paths, without leading or trailing slash.
    #[serde(default)]
    pub items: Vec<String>,
    /// Whether the items were uploaded by the actor. Resolved from
    /// ownership records by the gate when absent.
    #[serde(default)]
    pub ownership: Option<Ownership>,
    /// Grant payload for invitations and permission updates.
    ///
    /// Only consulted for `invite_members`. Without it that action is
    /// decided on the capability alone, which answers "may this actor
    /// invite at all"; anything that hands out access must attach one.
    #[serde(default)]
    pub grant: Option<GrantRequest>,
}

impl AccessRequest {
    /// A request with no target items.
    pub fn new(actor: impl Into<String>, action: PermissionAction) -> Self {
        Self {
            actor: actor.into(),
            action,
            items: Vec::new(),
            ownership: None,
            grant: None,
        }
    }

    /// Set the target item paths.
    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    /// Set the ownership of the target items.
    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = Some(ownership);
        self
    }

    /// Attach a grant payload.
    pub fn with_grant(mut self, permission: StructuredPermission, scope: Scope) -> Self {
        self.grant = Some(GrantRequest { permission, scope });
        self
    }
}

/// Decide `request` against `bucket` and the actor's member record.
///
/// `member` must be the actor's record for this bucket, or `None` when
/// there is none. The escalation step runs only when `request.grant` is set.
pub fn authorize(bucket: &Bucket, member: Option<&Member>, request: &AccessRequest) -> Decision {
    if bucket.is_owner(&request.actor) {
        return Decision::Allow;
    }

    let Some(member) = member else {
        return Decision::Deny(DenyReason::Forbidden);
    };

    let permission = effective_permission(&member.permission);

    if !permission.has_capability(request.action, request.ownership) {
        return Decision::Deny(DenyReason::Forbidden);
    }

    if request
        .items
        .iter()
        .any(|path| !is_item_in_scope(Some(&member.scope), path))
    {
        return Decision::Deny(DenyReason::ScopeViolation);
    }

    if request.action == PermissionAction::InviteMembers {
        if let Some(grant) = &request.grant {
            let requested = grant.permission.clone().normalize();
            if check_grant(&permission, &member.scope, &requested, &grant.scope).is_err() {
                return Decision::Deny(DenyReason::EscalationDenied);
            }
        }
    }

    Decision::Allow
}

/// Resolve whether `actor` uploaded every item in `items`.
///
/// `None` when there are no items; `Own` only if each item has a record
/// naming the actor as uploader.
pub fn ownership_of(
    items: &[String],
    actor: &str,
    records: &[FileOwnershipRecord],
) -> Option<Ownership> {
    if items.is_empty() {
        return None;
    }

    let all_own = items.iter().all(|path| {
        records
            .iter()
            .any(|record| record.file_path == *path && record.is_owned_by(actor))
    });

    Some(if all_own {
        Ownership::Own
    } else {
        Ownership::Other
    })
}

/// Deny once a share token or invitation is past `expires_at`.
pub fn check_share_expiry(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Decision {
    match expires_at {
        Some(expiry) if now >= expiry => Decision::Deny(DenyReason::Expired),
        _ => Decision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use bucketshare_entity::permission::{Extra, LegacyPermission, UploadLevel, ViewLevel};

    use super::*;

    const OWNER: &str = "owner@example.com";
    const ALICE: &str = "alice@example.com";

    fn bucket() -> Bucket {
        Bucket::new("media", OWNER, Utc::now())
    }

    fn member(permission: LegacyPermission, scope: Scope) -> Member {
        Member::new(ALICE, "media", permission, scope, Some(OWNER.into()), Utc::now())
    }

    fn record(path: &str, uploader: &str) -> FileOwnershipRecord {
        FileOwnershipRecord {
            bucket_name: "media".into(),
            file_path: path.into(),
            uploader_email: uploader.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_is_always_allowed() {
        let request =
            AccessRequest::new(OWNER, PermissionAction::DeleteFolders).with_items(["anywhere"]);
        assert_eq!(authorize(&bucket(), None, &request), Decision::Allow);
    }

    #[test]
    fn test_non_member_is_forbidden() {
        let request = AccessRequest::new(ALICE, PermissionAction::ViewFiles);
        assert_eq!(
            authorize(&bucket(), None, &request),
            Decision::Deny(DenyReason::Forbidden)
        );
    }

    #[test]
    fn test_missing_capability_is_forbidden() {
        let m = member(
            LegacyPermission {
                view_only: true,
                ..Default::default()
            },
            Scope::entire(),
        );
        let request = AccessRequest::new(ALICE, PermissionAction::Download);
        assert_eq!(
            authorize(&bucket(), Some(&m), &request),
            Decision::Deny(DenyReason::Forbidden)
        );
    }

    #[test]
    fn test_scope_violation_after_capability() {
        let m = member(
            LegacyPermission {
                view_download: true,
                ..Default::default()
            },
            Scope::specific(["projects/2024"]),
        );
        let inside = AccessRequest::new(ALICE, PermissionAction::Download)
            .with_items(["projects/2024/report.pdf"]);
        assert_eq!(authorize(&bucket(), Some(&m), &inside), Decision::Allow);

        let outside = AccessRequest::new(ALICE, PermissionAction::Download)
            .with_items(["projects/2024/report.pdf", "projects/2023/x"]);
        assert_eq!(
            authorize(&bucket(), Some(&m), &outside),
            Decision::Deny(DenyReason::ScopeViolation)
        );
    }

    #[test]
    fn test_manage_own_uses_ownership() {
        let m = member(
            LegacyPermission {
                upload_view_own: true,
                ..Default::default()
            },
            Scope::entire(),
        );
        let items = vec!["docs/mine.txt".to_string()];
        let records = vec![record("docs/mine.txt", ALICE)];

        let own = ownership_of(&items, ALICE, &records).expect("items present");
        let request = AccessRequest::new(ALICE, PermissionAction::DeleteFile)
            .with_items(items.clone())
            .with_ownership(own);
        assert_eq!(authorize(&bucket(), Some(&m), &request), Decision::Allow);

        let theirs = vec![record("docs/mine.txt", "bob@example.com")];
        let other = ownership_of(&items, ALICE, &theirs).expect("items present");
        assert_eq!(other, Ownership::Other);
        let request = AccessRequest::new(ALICE, PermissionAction::DeleteFile)
            .with_items(items)
            .with_ownership(other);
        assert_eq!(
            authorize(&bucket(), Some(&m), &request),
            Decision::Deny(DenyReason::Forbidden)
        );
    }

    #[test]
    fn test_ownership_of_requires_every_item() {
        let items = vec!["a".to_string(), "b".to_string()];
        let records = vec![record("a", ALICE)];
        assert_eq!(ownership_of(&items, ALICE, &records), Some(Ownership::Other));
        assert_eq!(ownership_of(&[], ALICE, &records), None);
    }

    #[test]
    fn test_invite_escalation_is_denied() {
        let m = member(
            LegacyPermission {
                view_only: true,
                invite_members: true,
                ..Default::default()
            },
            Scope::entire(),
        );
        let within = AccessRequest::new(ALICE, PermissionAction::InviteMembers).with_grant(
            StructuredPermission::new(ViewLevel::ViewAll, UploadLevel::None, []),
            Scope::specific(["docs"]),
        );
        assert_eq!(authorize(&bucket(), Some(&m), &within), Decision::Allow);

        let beyond = AccessRequest::new(ALICE, PermissionAction::InviteMembers).with_grant(
            StructuredPermission::new(ViewLevel::ViewAll, UploadLevel::None, [Extra::Download]),
            Scope::entire(),
        );
        assert_eq!(
            authorize(&bucket(), Some(&m), &beyond),
            Decision::Deny(DenyReason::EscalationDenied)
        );
    }

    #[test]
    fn test_invite_without_grant_checks_capability_only() {
        let inviter = member(
            LegacyPermission {
                view_only: true,
                invite_members: true,
                ..Default::default()
            },
            Scope::specific(["docs"]),
        );
        let viewer = member(
            LegacyPermission {
                view_only: true,
                ..Default::default()
            },
            Scope::entire(),
        );
        let request = AccessRequest::new(ALICE, PermissionAction::InviteMembers);
        assert!(request.grant.is_none());
        assert_eq!(authorize(&bucket(), Some(&inviter), &request), Decision::Allow);
        assert_eq!(
            authorize(&bucket(), Some(&viewer), &request),
            Decision::Deny(DenyReason::Forbidden)
        );
    }

    #[test]
    fn test_invite_scope_escalation_is_denied() {
        let m = member(
            LegacyPermission {
                view_only: true,
                invite_members: true,
                ..Default::default()
            },
            Scope::specific(["docs"]),
        );
        let request = AccessRequest::new(ALICE, PermissionAction::InviteMembers).with_grant(
            StructuredPermission::new(ViewLevel::ViewAll, UploadLevel::None, []),
            Scope::entire(),
        );
        assert_eq!(
            authorize(&bucket(), Some(&m), &request),
            Decision::Deny(DenyReason::EscalationDenied)
        );
    }

    #[test]
    fn test_into_result_maps_reasons() {
        use bucketshare_core::error::ErrorKind;

        assert!(Decision::Allow.into_result().is_ok());
        let kind = |d: Decision| d.into_result().expect_err("denied").kind;
        assert_eq!(kind(Decision::Deny(DenyReason::Forbidden)), ErrorKind::Authorization);
        assert_eq!(
            kind(Decision::Deny(DenyReason::ScopeViolation)),
            ErrorKind::Authorization
        );
        assert_eq!(kind(Decision::Deny(DenyReason::NotFound)), ErrorKind::NotFound);
        assert_eq!(kind(Decision::Deny(DenyReason::Expired)), ErrorKind::Expired);
    }

    #[test]
    fn test_check_share_expiry() {
        let now = Utc::now();
        assert_eq!(check_share_expiry(None, now), Decision::Allow);
        assert_eq!(
            check_share_expiry(Some(now + Duration::minutes(5)), now),
            Decision::Allow
        );
        assert_eq!(
            check_share_expiry(Some(now - Duration::minutes(5)), now),
            Decision::Deny(DenyReason::Expired)
        );
    }

    #[test]
    fn test_decision_serde_shape() {
        let json = serde_json::to_value(Decision::Deny(DenyReason::ScopeViolation)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"verdict": "deny", "reason": "scope_violation"})
        );
        let allow = serde_json::to_value(Decision::Allow).unwrap();
        assert_eq!(allow, serde_json::json!({"verdict": "allow"}));
    }
}
