//! Scope value object.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How a scope restricts the folders a member sees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeType {
    /// The whole bucket.
    #[default]
    Entire,
    /// Listed folders, their descendants, and the ancestors leading to them.
    Specific,
    /// Loose prefix matching against listed folders.
    Nested,
}

impl ScopeType {
    /// Return the scope type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entire => "entire",
            Self::Specific => "specific",
            Self::Nested => "nested",
        }
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A member's folder scope.
///
/// `folders` holds paths without leading or trailing slash and is ignored
/// for [`ScopeType::Entire`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    /// Scope kind.
    #[serde(rename = "type")]
    pub scope_type: ScopeType,
    /// Granted folder paths.
    #[serde(default)]
    pub folders: BTreeSet<String>,
}

impl Scope {
    /// Scope covering the whole bucket.
    pub fn entire() -> Self {
        Self::default()
    }

    /// Scope limited to `folders` with anchored matching.
    pub fn specific<I, S>(folders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_folders(ScopeType::Specific, folders)
    }

    /// Scope limited to `folders` with unanchored prefix matching.
    pub fn nested<I, S>(folders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_folders(ScopeType::Nested, folders)
    }

    fn with_folders<I, S>(scope_type: ScopeType, folders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            scope_type,
            folders: folders
                .into_iter()
                .map(|f| f.as_ref().trim_matches('/').to_string())
                .filter(|f| !f.is_empty())
                .collect(),
        }
    }

    /// Whether the scope covers the whole bucket.
    pub fn is_entire(&self) -> bool {
        self.scope_type == ScopeType::Entire
    }
}
