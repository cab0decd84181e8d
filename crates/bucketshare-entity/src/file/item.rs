//! Listing entry for a bucket object or folder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file or folder as returned by a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageItem {
    /// Full path without leading or trailing slash.
    pub path: String,
    /// Display name (final path segment).
    pub name: String,
    /// Whether the entry is a folder.
    #[serde(default)]
    pub is_folder: bool,
    /// Object size in bytes, absent for folders.
    #[serde(default)]
    pub size: Option<u64>,
    /// Last modification time reported by storage.
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

impl StorageItem {
    /// A file entry at `path`.
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        let path = path.into();
        Self {
            name: final_segment(&path).to_string(),
            path,
            is_folder: false,
            size: Some(size),
            last_modified: None,
        }
    }

    /// A folder entry at `path`.
    pub fn folder(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: final_segment(&path).to_string(),
            path,
            is_folder: true,
            size: None,
            last_modified: None,
        }
    }
}

/// Final `/`-separated segment of `path`.
pub fn final_segment(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}
