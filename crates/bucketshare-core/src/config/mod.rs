//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! an optional TOML file merged with `BUCKETSHARE__*` environment variables.
//! Every section has defaults so the engine runs without a config file.

pub mod access;
pub mod logging;

use serde::{Deserialize, Serialize};
use validator::Validate;

use self::access::AccessConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Invitation and access-engine settings.
    #[serde(default)]
    pub access: AccessConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// The file is optional; a missing file yields the defaults overlaid
    /// with any `BUCKETSHARE__SECTION__KEY` environment variables.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("BUCKETSHARE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        tracing::debug!(path, "Configuration loaded");
        Ok(loaded)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), AppError> {
        self.access.validate()?;
        Ok(())
    }
}
