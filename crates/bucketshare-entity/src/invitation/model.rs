//! Invitation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::permission::LegacyPermission;
use crate::scope::Scope;

/// Lifecycle state of an invitation at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Awaiting acceptance.
    Pending,
    /// Accepted; a member row exists.
    Accepted,
    /// Past its expiry without being accepted.
    Expired,
}

/// An invitation to join a bucket with a requested permission and scope.
///
/// Transitions once from pending to accepted, or expires. Never reopened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Invitation {
    /// Opaque acceptance token.
    pub token: String,
    /// Target bucket.
    pub bucket_name: String,
    /// Invitee email.
    pub email: String,
    /// Requested permission flags.
    #[sqlx(json)]
    pub permission: LegacyPermission,
    /// Requested folder scope.
    #[sqlx(json)]
    pub scope: Scope,
    /// Inviter email.
    pub created_by: String,
    /// When the invitation was created.
    pub created_at: DateTime<Utc>,
    /// When the invitation stops being acceptable.
    pub expires_at: DateTime<Utc>,
    /// Whether the invitation was accepted.
    pub accepted: bool,
}

impl Invitation {
    /// Whether `now` is at or past the expiry timestamp.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Status at `now`. Acceptance wins over expiry.
    pub fn status(&self, now: DateTime<Utc>) -> InvitationStatus {
        if self.accepted {
            InvitationStatus::Accepted
        } else if self.is_expired(now) {
            InvitationStatus::Expired
        } else {
            InvitationStatus::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn invitation(now: DateTime<Utc>) -> Invitation {
        Invitation {
            token: "tok".into(),
            bucket_name: "media".into(),
            email: "guest@example.com".into(),
            permission: LegacyPermission::default(),
            scope: Scope::entire(),
            created_by: "owner@example.com".into(),
            created_at: now,
            expires_at: now + Duration::hours(1),
            accepted: false,
        }
    }

    #[test]
    fn test_status_transitions() {
        let now = Utc::now();
        let mut inv = invitation(now);
        assert_eq!(inv.status(now), InvitationStatus::Pending);
        assert_eq!(
            inv.status(now + Duration::hours(1)),
            InvitationStatus::Expired
        );

        inv.accepted = true;
        assert_eq!(
            inv.status(now + Duration::hours(2)),
            InvitationStatus::Accepted
        );
    }
}
