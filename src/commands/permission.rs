//! Permission CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use bucketshare_auth::bridge::{effective_permission, from_legacy, to_legacy};
use bucketshare_auth::escalation::check_grant;
use bucketshare_core::result::AppResult;
use bucketshare_entity::permission::{
    LegacyPermission, Ownership, PermissionAction, StructuredPermission,
};
use bucketshare_entity::scope::Scope;

use super::{PermissionRow, parse_json};
use crate::output::{self, OutputFormat};

/// Arguments for permission commands
#[derive(Debug, Args)]
pub struct PermissionArgs {
    /// Permission subcommand
    #[command(subcommand)]
    pub command: PermissionCommand,
}

/// Permission subcommands
#[derive(Debug, Subcommand)]
pub enum PermissionCommand {
    /// Repair a structured permission into a valid combination
    Normalize {
        /// Structured permission JSON
        #[arg(long)]
        json: String,
    },
    /// Convert legacy flags to a structured permission
    FromLegacy {
        /// Legacy permission JSON (camelCase flags)
        #[arg(long)]
        json: String,
    },
    /// Convert a structured permission to legacy flags
    ToLegacy {
        /// Structured permission JSON
        #[arg(long)]
        json: String,
    },
    /// Check whether legacy flags allow an action
    Check {
        /// Legacy permission JSON
        #[arg(long)]
        legacy: String,
        /// Action name, e.g. `delete_file`
        #[arg(long)]
        action: String,
        /// Ownership of the target files: own or other
        #[arg(long)]
        ownership: Option<String>,
    },
    /// Check whether a grantor may hand out a permission
    CanGrant {
        /// Grantor's legacy permission JSON
        #[arg(long)]
        grantor: String,
        /// Requested legacy permission JSON
        #[arg(long)]
        requested: String,
        /// Grantor's scope JSON (default: entire bucket)
        #[arg(long)]
        grantor_scope: Option<String>,
        /// Requested scope JSON (default: entire bucket)
        #[arg(long)]
        requested_scope: Option<String>,
    },
}

/// Capability check display row
#[derive(Debug, Serialize, Tabled)]
struct CheckRow {
    /// Action checked
    action: String,
    /// Ownership used for the check
    ownership: String,
    /// Whether the action is allowed
    allowed: bool,
}

/// Grant check display row
#[derive(Debug, Serialize, Tabled)]
struct GrantRow {
    /// Whether the grant is allowed
    allowed: bool,
    /// Why the grant was refused
    reason: String,
}

/// Execute permission commands
pub fn execute(args: &PermissionArgs, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        PermissionCommand::Normalize { json } => {
            let permission: StructuredPermission = parse_json(json, "permission")?;
            output::print_item(&PermissionRow::from(&permission.normalize()), format);
        }
        PermissionCommand::FromLegacy { json } => {
            let legacy: LegacyPermission = parse_json(json, "legacy permission")?;
            output::print_item(&PermissionRow::from(&from_legacy(&legacy)), format);
        }
        PermissionCommand::ToLegacy { json } => {
            let permission: StructuredPermission = parse_json(json, "permission")?;
            output::print_object(&to_legacy(&permission.normalize()), format);
        }
        PermissionCommand::Check {
            legacy,
            action,
            ownership,
        } => {
            let legacy: LegacyPermission = parse_json(legacy, "legacy permission")?;
            let action = action
                .parse::<PermissionAction>()
                .unwrap_or(PermissionAction::Unknown);
            let ownership = ownership
                .as_deref()
                .map(str::parse::<Ownership>)
                .transpose()?;

            let allowed = effective_permission(&legacy).has_capability(action, ownership);
            let row = CheckRow {
                action: action.to_string(),
                ownership: match ownership {
                    Some(Ownership::Own) => "own".to_string(),
                    Some(Ownership::Other) => "other".to_string(),
                    None => "-".to_string(),
                },
                allowed,
            };
            output::print_item(&row, format);
        }
        PermissionCommand::CanGrant {
            grantor,
            requested,
            grantor_scope,
            requested_scope,
        } => {
            let grantor: LegacyPermission = parse_json(grantor, "grantor permission")?;
            let requested: LegacyPermission = parse_json(requested, "requested permission")?;
            let grantor_scope = optional_scope(grantor_scope.as_deref())?;
            let requested_scope = optional_scope(requested_scope.as_deref())?;

            let result = check_grant(
                &effective_permission(&grantor),
                &grantor_scope,
                &effective_permission(&requested),
                &requested_scope,
            );
            let row = GrantRow {
                allowed: result.is_ok(),
                reason: result.err().map(|d| d.to_string()).unwrap_or_default(),
            };
            output::print_item(&row, format);
        }
    }

    Ok(())
}

fn optional_scope(raw: Option<&str>) -> AppResult<Scope> {
    raw.map(|s| parse_json(s, "scope"))
        .transpose()
        .map(Option::unwrap_or_default)
}
