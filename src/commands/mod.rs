//! CLI command definitions and dispatch.

pub mod access;
pub mod permission;
pub mod scope;

use std::path::Path;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tabled::Tabled;

use bucketshare_core::config::AppConfig;
use bucketshare_core::error::{AppError, ErrorKind};
use bucketshare_core::result::AppResult;
use bucketshare_entity::file::StorageItem;
use bucketshare_entity::permission::StructuredPermission;

use crate::output::OutputFormat;

/// Bucketshare: evaluate bucket permissions, scopes, and access decisions
#[derive(Debug, Parser)]
#[command(name = "bucketshare", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/bucketshare.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Structured and legacy permission operations
    Permission(permission::PermissionArgs),
    /// Folder scope checks and listing filters
    Scope(scope::ScopeArgs),
    /// Access decisions against a store fixture
    Access(access::AccessArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        match &self.command {
            Commands::Permission(args) => permission::execute(args, self.format),
            Commands::Scope(args) => scope::execute(args, config, self.format),
            Commands::Access(args) => access::execute(args, config, self.format).await,
        }
    }
}

/// Helper: parse an inline JSON argument
pub fn parse_json<T: DeserializeOwned>(raw: &str, what: &str) -> AppResult<T> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::validation(format!("Invalid {} JSON: {}", what, e)))
}

/// Helper: read and parse a JSON file
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AppError::with_source(ErrorKind::Io, format!("Failed to read '{}'", path.display()), e)
    })?;
    parse_json(&raw, &path.display().to_string())
}

/// Structured permission display row
#[derive(Debug, Serialize, Tabled)]
pub struct PermissionRow {
    /// View level
    pub view: String,
    /// Upload level
    pub upload: String,
    /// Extras, comma separated
    pub extras: String,
}

impl From<&StructuredPermission> for PermissionRow {
    fn from(p: &StructuredPermission) -> Self {
        Self {
            view: p.view.to_string(),
            upload: p.upload.to_string(),
            extras: p
                .extras
                .iter()
                .map(|e| e.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Listing entry display row
#[derive(Debug, Serialize, Tabled)]
pub struct ItemRow {
    /// Full path
    pub path: String,
    /// `folder` or `file`
    pub kind: String,
    /// Size in bytes
    pub size: String,
}

impl From<&StorageItem> for ItemRow {
    fn from(item: &StorageItem) -> Self {
        Self {
            path: item.path.clone(),
            kind: if item.is_folder { "folder" } else { "file" }.to_string(),
            size: item.size.map(|s| s.to_string()).unwrap_or_default(),
        }
    }
}
