//! Scope CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use bucketshare_auth::scope::{filter_listing, is_item_in_scope, normalize_item_path, retain_in_scope};
use bucketshare_core::config::AppConfig;
use bucketshare_core::result::AppResult;
use bucketshare_entity::file::StorageItem;
use bucketshare_entity::scope::Scope;

use super::{ItemRow, parse_json, read_json_file};
use crate::output::{self, OutputFormat};

/// Arguments for scope commands
#[derive(Debug, Args)]
pub struct ScopeArgs {
    /// Scope subcommand
    #[command(subcommand)]
    pub command: ScopeCommand,
}

/// Scope subcommands
#[derive(Debug, Subcommand)]
pub enum ScopeCommand {
    /// Check whether a path is inside a scope
    Check {
        /// Scope JSON, e.g. `{"type":"specific","folders":["docs"]}`
        #[arg(long)]
        scope: String,
        /// Item path
        #[arg(long)]
        path: String,
    },
    /// Filter a listing through a scope
    List {
        /// Scope JSON
        #[arg(long)]
        scope: String,
        /// Folder being listed (omit for the bucket root)
        #[arg(long)]
        folder: Option<String>,
        /// JSON file holding an array of listing entries
        #[arg(long)]
        items: PathBuf,
    },
}

/// Scope check display row
#[derive(Debug, Serialize, Tabled)]
struct ScopeCheckRow {
    /// Normalized item path
    path: String,
    /// Scope type
    scope: String,
    /// Whether the path is in scope
    in_scope: bool,
}

/// Execute scope commands
pub fn execute(args: &ScopeArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        ScopeCommand::Check { scope, path } => {
            let scope: Scope = parse_json(scope, "scope")?;
            let path = normalize_item_path(path);
            let row = ScopeCheckRow {
                path: path.to_string(),
                scope: scope.scope_type.to_string(),
                in_scope: is_item_in_scope(Some(&scope), path),
            };
            output::print_item(&row, format);
        }
        ScopeCommand::List {
            scope,
            folder,
            items,
        } => {
            let scope: Scope = parse_json(scope, "scope")?;
            let items: Vec<StorageItem> = read_json_file(items)?;

            let visible = if config.access.synthesize_root_folders {
                filter_listing(Some(&scope), folder.as_deref(), items)
            } else {
                retain_in_scope(Some(&scope), items)
            };

            let rows: Vec<ItemRow> = visible.iter().map(ItemRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
