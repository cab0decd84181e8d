//! Access engine configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Invitation lifetime and listing behavior.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Hours an invitation stays acceptable after creation.
    #[serde(default = "default_invitation_ttl")]
    #[validate(range(min = 1, max = 8760))]
    pub invitation_ttl_hours: u64,
    /// Whether root listings for folder-scoped members show one virtual
    /// folder per granted path instead of the filtered bucket root.
    #[serde(default = "default_true")]
    pub synthesize_root_folders: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            invitation_ttl_hours: default_invitation_ttl(),
            synthesize_root_folders: default_true(),
        }
    }
}

impl AccessConfig {
    /// Invitation lifetime as a `chrono`-compatible number of seconds.
    pub fn invitation_ttl_seconds(&self) -> i64 {
        i64::try_from(self.invitation_ttl_hours.saturating_mul(3600)).unwrap_or(i64::MAX)
    }
}

fn default_invitation_ttl() -> u64 {
    168
}

fn default_true() -> bool {
    true
}
