//! Structured capability model with dependency repair.
//!
//! A [`StructuredPermission`] is three independent-looking fields that are
//! in fact coupled:
//! - no view access implies no upload access and no extras;
//! - managing all files implies viewing all files;
//! - `download`/`share` need some view level;
//! - `create_folders`/`delete_folders` need some upload level.
//!
//! [`StructuredPermission::normalize`] repairs any combination into one
//! that satisfies these rules instead of rejecting it.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::action::{Ownership, PermissionAction};

/// Which files a member may list and preview.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ViewLevel {
    /// No view access.
    #[default]
    None,
    /// Only files the member uploaded.
    ViewOwn,
    /// Every file in scope.
    ViewAll,
}

impl ViewLevel {
    /// Ordinal used for subset comparisons (none=0, own=1, all=2).
    pub fn level(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::ViewOwn => 1,
            Self::ViewAll => 2,
        }
    }

    /// Return the level as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ViewOwn => "view_own",
            Self::ViewAll => "view_all",
        }
    }
}

impl fmt::Display for ViewLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a member may upload, and which files it may rename or delete.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum UploadLevel {
    /// No upload access.
    #[default]
    None,
    /// Upload, and rename/delete files the member uploaded.
    UploadManageOwn,
    /// Upload, and rename/delete any file.
    UploadManageAll,
}

impl UploadLevel {
    /// Ordinal used for subset comparisons (none=0, own=1, all=2).
    pub fn level(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::UploadManageOwn => 1,
            Self::UploadManageAll => 2,
        }
    }

    /// Return the level as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::UploadManageOwn => "upload_manage_own",
            Self::UploadManageAll => "upload_manage_all",
        }
    }
}

impl fmt::Display for UploadLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Independently togglable add-on capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extra {
    /// Download file contents.
    Download,
    /// Generate share links.
    Share,
    /// Create folders.
    CreateFolders,
    /// Delete folders.
    DeleteFolders,
    /// Invite other members.
    InviteMembers,
}

impl Extra {
    /// Every extra, in declaration order.
    pub const ALL: [Extra; 5] = [
        Extra::Download,
        Extra::Share,
        Extra::CreateFolders,
        Extra::DeleteFolders,
        Extra::InviteMembers,
    ];

    /// Return the extra as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Share => "share",
            Self::CreateFolders => "create_folders",
            Self::DeleteFolders => "delete_folders",
            Self::InviteMembers => "invite_members",
        }
    }

    /// Whether the extra depends on some view level.
    fn requires_view(&self) -> bool {
        matches!(self, Self::Download | Self::Share)
    }

    /// Whether the extra depends on some upload level.
    fn requires_upload(&self) -> bool {
        matches!(self, Self::CreateFolders | Self::DeleteFolders)
    }
}

impl fmt::Display for Extra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The canonical capability representation.
///
/// Fields are public so collaborators can express exactly what they
/// received; values built that way may violate the dependency rules until
/// passed through [`normalize`](Self::normalize). [`new`](Self::new) always
/// returns a normalized value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructuredPermission {
    /// View level.
    #[serde(default)]
    pub view: ViewLevel,
    /// Upload level.
    #[serde(default)]
    pub upload: UploadLevel,
    /// Add-on capabilities.
    #[serde(default)]
    pub extras: BTreeSet<Extra>,
}

impl StructuredPermission {
    /// Build a permission and repair it into a valid combination.
    pub fn new(
        view: ViewLevel,
        upload: UploadLevel,
        extras: impl IntoIterator<Item = Extra>,
    ) -> Self {
        Self {
            view,
            upload,
            extras: extras.into_iter().collect(),
        }
        .normalize()
    }

    /// A permission granting nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// A permission granting everything a member can hold.
    pub fn full() -> Self {
        Self::new(ViewLevel::ViewAll, UploadLevel::UploadManageAll, Extra::ALL)
    }

    /// Apply the dependency rules, in order:
    ///
    /// 1. `view == none` clears upload and extras, and stops.
    /// 2. `upload_manage_own` with no view raises view to `view_own`.
    /// 3. `upload_manage_all` raises view to `view_all`.
    /// 4. `download`/`share` are dropped without view.
    /// 5. `create_folders`/`delete_folders` are dropped without upload.
    pub fn normalize(mut self) -> Self {
        if self.view == ViewLevel::None {
            self.upload = UploadLevel::None;
            self.extras.clear();
            return self;
        }

        // Unreachable after rule 1.
        if self.upload == UploadLevel::UploadManageOwn && self.view == ViewLevel::None {
            self.view = ViewLevel::ViewOwn;
        }

        if self.upload == UploadLevel::UploadManageAll && self.view != ViewLevel::ViewAll {
            self.view = ViewLevel::ViewAll;
        }

        let has_view = self.view != ViewLevel::None;
        let has_upload = self.upload != UploadLevel::None;
        self.extras.retain(|extra| {
            (has_view || !extra.requires_view()) && (has_upload || !extra.requires_upload())
        });

        self
    }

    /// Whether the value already satisfies every dependency rule.
    pub fn is_normalized(&self) -> bool {
        self.clone().normalize() == *self
    }

    /// Whether `extra` is present.
    pub fn has_extra(&self, extra: Extra) -> bool {
        self.extras.contains(&extra)
    }

    /// Decide whether this permission covers `action`.
    ///
    /// `ownership` only matters for rename/delete under
    /// `upload_manage_own`, where the file must be the actor's own.
    pub fn has_capability(&self, action: PermissionAction, ownership: Option<Ownership>) -> bool {
        match action {
            PermissionAction::ViewFiles => self.view != ViewLevel::None,
            PermissionAction::ViewOwnFiles => {
                matches!(self.view, ViewLevel::ViewOwn | ViewLevel::ViewAll)
            }
            PermissionAction::ViewAllFiles => self.view == ViewLevel::ViewAll,
            PermissionAction::Upload => self.upload != UploadLevel::None,
            PermissionAction::RenameFile | PermissionAction::DeleteFile => match self.upload {
                UploadLevel::UploadManageAll => true,
                UploadLevel::UploadManageOwn => ownership == Some(Ownership::Own),
                UploadLevel::None => false,
            },
            PermissionAction::Download => self.has_extra(Extra::Download),
            PermissionAction::Share => self.has_extra(Extra::Share),
            PermissionAction::CreateFolders => self.has_extra(Extra::CreateFolders),
            PermissionAction::DeleteFolders => self.has_extra(Extra::DeleteFolders),
            PermissionAction::InviteMembers => self.has_extra(Extra::InviteMembers),
            PermissionAction::Unknown => false,
        }
    }
}

impl fmt::Display for StructuredPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extras: Vec<&str> = self.extras.iter().map(Extra::as_str).collect();
        write!(
            f,
            "view={} upload={} extras=[{}]",
            self.view,
            self.upload,
            extras.join(",")
        )
    }
}
