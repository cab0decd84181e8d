//! Legacy flat-boolean permission encoding.

use serde::{Deserialize, Serialize};

/// Ten independent booleans persisted by earlier releases and still used
/// on the wire.
///
/// Nothing ties the flags together; any combination deserializes. Missing
/// fields are treated as `false`. Convert to a structured permission before
/// making access decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyPermission {
    /// View every file, no download.
    pub view_only: bool,
    /// View and download every file.
    pub view_download: bool,
    /// Upload without any view access.
    pub upload_only: bool,
    /// Upload and view own uploads.
    pub upload_view_own: bool,
    /// Upload and view every file.
    pub upload_view_all: bool,
    /// Delete any file.
    pub delete_files: bool,
    /// Delete own uploads.
    pub delete_own_files: bool,
    /// Create share links.
    pub generate_links: bool,
    /// Create folders.
    pub create_folder: bool,
    /// Invite other members.
    pub invite_members: bool,
}

impl LegacyPermission {
    /// Whether every flag is unset.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_false() {
        let parsed: LegacyPermission =
            serde_json::from_str(r#"{"uploadViewOwn": true}"#).expect("deserialize");
        assert!(parsed.upload_view_own);
        assert!(!parsed.view_only);
        assert!(!parsed.invite_members);
    }

    #[test]
    fn test_camel_case_field_names() {
        let value = LegacyPermission {
            delete_own_files: true,
            ..Default::default()
        };
        let json = serde_json::to_value(value).expect("serialize");
        assert_eq!(json["deleteOwnFiles"], serde_json::json!(true));
        assert_eq!(json.as_object().map(|o| o.len()), Some(10));
    }

    #[test]
    fn test_is_empty() {
        assert!(LegacyPermission::default().is_empty());
        assert!(
            !LegacyPermission {
                view_only: true,
                ..Default::default()
            }
            .is_empty()
        );
    }
}
