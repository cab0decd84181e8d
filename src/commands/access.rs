//! Access decision CLI commands over a JSON store fixture.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use bucketshare_auth::access::{AccessGate, AccessRequest, Decision};
use bucketshare_auth::store::{MemoryStore, StoreFixture};
use bucketshare_core::config::AppConfig;
use bucketshare_core::result::AppResult;
use bucketshare_entity::file::StorageItem;
use bucketshare_entity::permission::{Ownership, PermissionAction};

use super::{ItemRow, read_json_file};
use crate::output::{self, OutputFormat};

/// Arguments for access commands
#[derive(Debug, Args)]
pub struct AccessArgs {
    /// Access subcommand
    #[command(subcommand)]
    pub command: AccessCommand,
}

/// Access subcommands
#[derive(Debug, Subcommand)]
pub enum AccessCommand {
    /// Decide whether an actor may perform an action
    Authorize {
        /// JSON store fixture (buckets, members, invitations, ownership)
        #[arg(long)]
        fixture: PathBuf,
        /// Acting user email
        #[arg(long)]
        actor: String,
        /// Bucket name
        #[arg(long)]
        bucket: String,
        /// Action name, e.g. `upload`
        #[arg(long)]
        action: String,
        /// Target item path (repeatable)
        #[arg(long = "item")]
        items: Vec<String>,
        /// Override ownership resolution: own or other
        #[arg(long)]
        ownership: Option<String>,
    },
    /// Filter a listing for an actor
    List {
        /// JSON store fixture
        #[arg(long)]
        fixture: PathBuf,
        /// Acting user email
        #[arg(long)]
        actor: String,
        /// Bucket name
        #[arg(long)]
        bucket: String,
        /// Folder being listed (omit for the bucket root)
        #[arg(long)]
        folder: Option<String>,
        /// JSON file holding an array of listing entries
        #[arg(long)]
        items: PathBuf,
    },
}

/// Decision display row
#[derive(Debug, Serialize, Tabled)]
struct DecisionRow {
    /// Acting user
    actor: String,
    /// Bucket name
    bucket: String,
    /// Action decided
    action: String,
    /// `allow` or `deny`
    verdict: String,
    /// Deny reason
    reason: String,
}

/// Execute access commands
pub async fn execute(args: &AccessArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        AccessCommand::Authorize {
            fixture,
            actor,
            bucket,
            action,
            items,
            ownership,
        } => {
            let gate = load_gate(fixture, config)?;
            let action = action
                .parse::<PermissionAction>()
                .unwrap_or(PermissionAction::Unknown);

            let mut request = AccessRequest::new(actor.as_str(), action).with_items(items.iter());
            if let Some(ownership) = ownership {
                request = request.with_ownership(ownership.parse::<Ownership>()?);
            }

            let decision = gate.authorize(bucket, request).await?;
            let row = DecisionRow {
                actor: actor.clone(),
                bucket: bucket.clone(),
                action: action.to_string(),
                verdict: match decision {
                    Decision::Allow => "allow".to_string(),
                    Decision::Deny(_) => "deny".to_string(),
                },
                reason: decision
                    .reason()
                    .map(|r| r.to_string())
                    .unwrap_or_default(),
            };
            output::print_item(&row, format);
        }
        AccessCommand::List {
            fixture,
            actor,
            bucket,
            folder,
            items,
        } => {
            let gate = load_gate(fixture, config)?;
            let items: Vec<StorageItem> = read_json_file(items)?;

            let visible = gate
                .filter_listing(actor, bucket, folder.as_deref(), items)
                .await?;

            let rows: Vec<ItemRow> = visible.iter().map(ItemRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}

fn load_gate(path: &Path, config: &AppConfig) -> AppResult<AccessGate> {
    let fixture: StoreFixture = read_json_file(path)?;
    debug!(
        path = %path.display(),
        buckets = fixture.buckets.len(),
        members = fixture.members.len(),
        "Loaded store fixture"
    );
    let store = Arc::new(MemoryStore::from_fixture(fixture));
    Ok(AccessGate::from_store(store, config.access.clone()))
}
