//! Actions checked against a structured permission.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operations a member may attempt on a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    /// List or preview any file visible to the member.
    ViewFiles,
    /// List or preview the member's own uploads.
    ViewOwnFiles,
    /// List or preview every file.
    ViewAllFiles,
    /// Upload a file.
    Upload,
    /// Rename a file.
    RenameFile,
    /// Delete a file.
    DeleteFile,
    /// Download a file.
    Download,
    /// Create a share link.
    Share,
    /// Create a folder.
    CreateFolders,
    /// Delete a folder.
    DeleteFolders,
    /// Invite another member.
    InviteMembers,
    /// Any action name this release does not know. Never granted.
    #[serde(other)]
    Unknown,
}

impl PermissionAction {
    /// Return the action as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewFiles => "view_files",
            Self::ViewOwnFiles => "view_own_files",
            Self::ViewAllFiles => "view_all_files",
            Self::Upload => "upload",
            Self::RenameFile => "rename_file",
            Self::DeleteFile => "delete_file",
            Self::Download => "download",
            Self::Share => "share",
            Self::CreateFolders => "create_folders",
            Self::DeleteFolders => "delete_folders",
            Self::InviteMembers => "invite_members",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the verdict depends on who uploaded the target files.
    pub fn depends_on_ownership(&self) -> bool {
        matches!(self, Self::RenameFile | Self::DeleteFile)
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PermissionAction {
    type Err = std::convert::Infallible;

    /// Unrecognized names parse to [`PermissionAction::Unknown`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "view_files" => Self::ViewFiles,
            "view_own_files" => Self::ViewOwnFiles,
            "view_all_files" => Self::ViewAllFiles,
            "upload" => Self::Upload,
            "rename_file" => Self::RenameFile,
            "delete_file" => Self::DeleteFile,
            "download" => Self::Download,
            "share" => Self::Share,
            "create_folders" => Self::CreateFolders,
            "delete_folders" => Self::DeleteFolders,
            "invite_members" => Self::InviteMembers,
            _ => Self::Unknown,
        })
    }
}

/// Whether the target files were uploaded by the acting member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ownership {
    /// Uploaded by the actor.
    Own,
    /// Uploaded by someone else, or unknown.
    Other,
}

impl FromStr for Ownership {
    type Err = bucketshare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "own" => Ok(Self::Own),
            "other" => Ok(Self::Other),
            _ => Err(bucketshare_core::AppError::validation(format!(
                "Invalid ownership: '{s}'. Expected one of: own, other"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_action_from_str() {
        let action: PermissionAction = "purge_bucket".parse().unwrap();
        assert_eq!(action, PermissionAction::Unknown);
        assert_eq!(
            "DELETE_FILE".parse::<PermissionAction>().unwrap(),
            PermissionAction::DeleteFile
        );
    }

    #[test]
    fn test_unknown_action_from_json() {
        let action: PermissionAction = serde_json::from_str(r#""purge_bucket""#).unwrap();
        assert_eq!(action, PermissionAction::Unknown);
    }

    #[test]
    fn test_ownership_from_str() {
        assert_eq!("own".parse::<Ownership>().unwrap(), Ownership::Own);
        assert!("mine".parse::<Ownership>().is_err());
    }
}
