//! Subset checks between a grantor's permission and a requested one.
//!
//! Only non-owner grantors are checked. Bucket owners hold no member
//! record and are unconstrained.

use bucketshare_entity::permission::{Extra, StructuredPermission, UploadLevel, ViewLevel};
use bucketshare_entity::scope::{Scope, ScopeType};

use crate::scope::matches_specific;

/// Which part of a grant exceeded the grantor's own access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EscalationDenial {
    /// Requested view level is above the grantor's.
    #[error("requested view level '{requested}' exceeds held '{held}'")]
    View {
        /// Requested level.
        requested: ViewLevel,
        /// Grantor's level.
        held: ViewLevel,
    },
    /// Requested upload level is above the grantor's.
    #[error("requested upload level '{requested}' exceeds held '{held}'")]
    Upload {
        /// Requested level.
        requested: UploadLevel,
        /// Grantor's level.
        held: UploadLevel,
    },
    /// Requested extra is not held by the grantor.
    #[error("requested capability '{0}' is not held")]
    Extra(Extra),
    /// Requested scope is wider than the grantor's.
    #[error("requested {requested} scope is not covered by held {held} scope")]
    Scope {
        /// Requested scope type.
        requested: ScopeType,
        /// Grantor's scope type.
        held: ScopeType,
    },
}

/// Whether `grantor` may hand out `requested`.
///
/// False when the requested view or upload level is higher, or when any
/// requested extra is missing from the grantor's extras. Reflexive for
/// normalized permissions.
pub fn can_grant(grantor: &StructuredPermission, requested: &StructuredPermission) -> bool {
    permission_denial(grantor, requested).is_none()
}

/// Whether a grantor limited to `grantor_scope` may hand out
/// `requested_scope`.
///
/// An `entire` grantor may grant anything. A folder-limited grantor can
/// never grant `entire`, and every requested folder must match one of the
/// grantor's folders under the anchored `specific` test (equal, descendant,
/// or ancestor). `nested` requests are checked the same way as `specific`.
pub fn can_grant_scope(grantor_scope: &Scope, requested_scope: &Scope) -> bool {
    if grantor_scope.is_entire() {
        return true;
    }

    match requested_scope.scope_type {
        ScopeType::Entire => false,
        ScopeType::Specific | ScopeType::Nested => requested_scope.folders.iter().all(|wanted| {
            grantor_scope
                .folders
                .iter()
                .any(|held| matches_specific(held, wanted))
        }),
    }
}

/// Combined permission and scope check reporting the first exceeded
/// dimension.
pub fn check_grant(
    grantor: &StructuredPermission,
    grantor_scope: &Scope,
    requested: &StructuredPermission,
    requested_scope: &Scope,
) -> Result<(), EscalationDenial> {
    if let Some(denial) = permission_denial(grantor, requested) {
        return Err(denial);
    }

    if !can_grant_scope(grantor_scope, requested_scope) {
        return Err(EscalationDenial::Scope {
            requested: requested_scope.scope_type,
            held: grantor_scope.scope_type,
        });
    }

    Ok(())
}

fn permission_denial(
    grantor: &StructuredPermission,
    requested: &StructuredPermission,
) -> Option<EscalationDenial> {
    if requested.view.level() > grantor.view.level() {
        return Some(EscalationDenial::View {
            requested: requested.view,
            held: grantor.view,
        });
    }

    if requested.upload.level() > grantor.upload.level() {
        return Some(EscalationDenial::Upload {
            requested: requested.upload,
            held: grantor.upload,
        });
    }

    requested
        .extras
        .difference(&grantor.extras)
        .next()
        .map(|extra| EscalationDenial::Extra(*extra))
}
