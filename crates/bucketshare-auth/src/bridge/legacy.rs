//! Legacy ⇄ structured permission mapping.
//!
//! The mapping is deliberately lossy in both directions:
//! - `deleteFiles` and `deleteOwnFiles` both become the `delete_folders`
//!   extra and cannot be told apart on the way back;
//! - `delete_folders` has no legacy flag and is dropped by [`to_legacy`];
//! - `uploadOnly` has no structured counterpart of its own.
//!
//! `to_legacy(from_legacy(l)) == l` does not hold in general. This is the
//! only legacy derivation in the workspace; every access decision goes
//! through [`effective_permission`].

use bucketshare_entity::permission::{
    Extra, LegacyPermission, StructuredPermission, UploadLevel, ViewLevel,
};

/// Derive a normalized structured permission from legacy flags.
///
/// Later checks override earlier ones:
/// - view: `view_all` for any of `uploadViewAll`, `viewOnly`,
///   `viewDownload`; else `view_own` for `uploadViewOwn`; else none.
/// - upload: `upload_manage_all` for `uploadViewAll`; else
///   `upload_manage_own` for `uploadViewOwn` or `uploadOnly`; else none.
/// - extras follow their flags, with `delete_folders` implied by either
///   file-delete flag.
pub fn from_legacy(legacy: &LegacyPermission) -> StructuredPermission {
    let view = if legacy.upload_view_all || legacy.view_only || legacy.view_download {
        ViewLevel::ViewAll
    } else if legacy.upload_view_own {
        ViewLevel::ViewOwn
    } else {
        ViewLevel::None
    };

    let upload = if legacy.upload_view_all {
        UploadLevel::UploadManageAll
    } else if legacy.upload_view_own || legacy.upload_only {
        UploadLevel::UploadManageOwn
    } else {
        UploadLevel::None
    };

    let flagged = [
        (legacy.view_download, Extra::Download),
        (legacy.generate_links, Extra::Share),
        (legacy.create_folder, Extra::CreateFolders),
        (
            legacy.delete_files || legacy.delete_own_files,
            Extra::DeleteFolders,
        ),
        (legacy.invite_members, Extra::InviteMembers),
    ];

    StructuredPermission {
        view,
        upload,
        extras: flagged
            .into_iter()
            .filter_map(|(set, extra)| set.then_some(extra))
            .collect(),
    }
    .normalize()
}

/// Encode a structured permission as legacy flags.
///
/// `delete_folders` is dropped; all unset flags stay false.
pub fn to_legacy(permission: &StructuredPermission) -> LegacyPermission {
    let mut legacy = LegacyPermission::default();

    if permission.view == ViewLevel::ViewAll {
        if permission.has_extra(Extra::Download) {
            legacy.view_download = true;
        } else {
            legacy.view_only = true;
        }
    }

    match permission.upload {
        UploadLevel::UploadManageOwn => {
            legacy.upload_view_own = true;
            legacy.delete_own_files = true;
        }
        UploadLevel::UploadManageAll => {
            legacy.upload_view_all = true;
            legacy.delete_files = true;
        }
        UploadLevel::None => {}
    }

    legacy.generate_links = permission.has_extra(Extra::Share);
    legacy.create_folder = permission.has_extra(Extra::CreateFolders);
    legacy.invite_members = permission.has_extra(Extra::InviteMembers);

    legacy
}

/// The permission an access decision uses for stored legacy flags:
/// `normalize(from_legacy(legacy))`.
pub fn effective_permission(legacy: &LegacyPermission) -> StructuredPermission {
    from_legacy(legacy).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_view_own_with_links() {
        let legacy = LegacyPermission {
            upload_view_own: true,
            generate_links: true,
            ..Default::default()
        };
        let p = effective_permission(&legacy);
        assert_eq!(
            p,
            StructuredPermission {
                view: ViewLevel::ViewOwn,
                upload: UploadLevel::UploadManageOwn,
                extras: [Extra::Share].into_iter().collect(),
            }
        );
        assert!(!p.has_extra(Extra::Download));
    }

    #[test]
    fn test_view_only_and_upload_view_all() {
        let viewer = effective_permission(&LegacyPermission {
            view_only: true,
            ..Default::default()
        });
        assert_eq!(
            viewer,
            StructuredPermission::new(ViewLevel::ViewAll, UploadLevel::None, [])
        );

        let manager = effective_permission(&LegacyPermission {
            upload_view_all: true,
            ..Default::default()
        });
        assert_eq!(
            manager,
            StructuredPermission::new(ViewLevel::ViewAll, UploadLevel::UploadManageAll, [])
        );
    }

    #[test]
    fn test_upload_only_without_view_collapses() {
        // uploadOnly alone yields manage_own with no view; normalize clears it.
        let p = effective_permission(&LegacyPermission {
            upload_only: true,
            create_folder: true,
            ..Default::default()
        });
        assert_eq!(p, StructuredPermission::none());
    }

    #[test]
    fn test_delete_flags_collapse_into_one_extra() {
        let a = LegacyPermission {
            upload_view_all: true,
            delete_files: true,
            ..Default::default()
        };
        let b = LegacyPermission {
            upload_view_all: true,
            delete_own_files: true,
            ..Default::default()
        };
        assert_ne!(a, b);
        assert_eq!(effective_permission(&a), effective_permission(&b));
        assert!(effective_permission(&a).has_extra(Extra::DeleteFolders));
    }

    #[test]
    fn test_delete_folders_dropped_on_the_way_back() {
        let p = StructuredPermission::new(
            ViewLevel::ViewAll,
            UploadLevel::UploadManageAll,
            [Extra::DeleteFolders],
        );
        let legacy = to_legacy(&p);
        assert!(legacy.upload_view_all);
        assert!(legacy.delete_files);
        assert!(!legacy.delete_own_files);
        assert!(!legacy.view_only);
    }

    #[test]
    fn test_view_own_with_download_is_lossy() {
        // Download under view_own has no legacy flag of its own.
        let p = StructuredPermission::new(
            ViewLevel::ViewOwn,
            UploadLevel::UploadManageOwn,
            [Extra::Download],
        );
        let legacy = to_legacy(&p);
        assert_eq!(
            legacy,
            LegacyPermission {
                upload_view_own: true,
                delete_own_files: true,
                ..Default::default()
            }
        );
        assert!(!effective_permission(&legacy).has_extra(Extra::Download));
    }

    #[test]
    fn test_view_all_download_selects_view_download() {
        let p = StructuredPermission::new(
            ViewLevel::ViewAll,
            UploadLevel::None,
            [Extra::Download, Extra::Share, Extra::InviteMembers],
        );
        let legacy = to_legacy(&p);
        assert!(legacy.view_download);
        assert!(!legacy.view_only);
        assert!(legacy.generate_links);
        assert!(legacy.invite_members);
        assert_eq!(effective_permission(&legacy), p);
    }

    #[test]
    fn test_every_legacy_value_maps_to_a_normalized_permission() {
        for mask in 0u16..1024 {
            let bit = |i: u16| mask & (1 << i) != 0;
            let legacy = LegacyPermission {
                view_only: bit(0),
                view_download: bit(1),
                upload_only: bit(2),
                upload_view_own: bit(3),
                upload_view_all: bit(4),
                delete_files: bit(5),
                delete_own_files: bit(6),
                generate_links: bit(7),
                create_folder: bit(8),
                invite_members: bit(9),
            };
            assert!(from_legacy(&legacy).is_normalized(), "mask {mask:#b}");
        }
    }
}
